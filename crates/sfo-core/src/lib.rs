//! Shared support code for param-sfo: errors, configuration and logging

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Result, SfoError};
