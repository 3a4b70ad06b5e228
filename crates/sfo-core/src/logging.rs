//! Logging infrastructure for param-sfo

use std::fs::File;
use std::io;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, LogLevel};

/// Initialize the logging system based on configuration
pub fn init(config: &Config) {
    let level = match config.debug.log_level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let (file_layer, file_error) = match open_log_file(config) {
        Some(Ok(file)) => (
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false)),
            None,
        ),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    // Log output goes to stderr so it never mixes with key/value listings
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(file_layer)
        .try_init()
        .is_ok();

    if let (true, Some(e)) = (installed, file_error) {
        tracing::warn!(
            "Cannot create log file {}: {}",
            config.debug.log_path.display(),
            e
        );
    }
}

/// Create the log file, or `None` when file logging is disabled
fn open_log_file(config: &Config) -> Option<io::Result<File>> {
    config
        .debug
        .log_to_file
        .then(|| File::create(&config.debug.log_path))
}

/// Initialize logging with default settings (for tools and quick starts)
pub fn init_default() {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Log an SFO codec trace message
#[macro_export]
macro_rules! sfo_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "sfo", $($arg)*)
    };
}

/// Log an SFO codec debug message
#[macro_export]
macro_rules! sfo_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "sfo", $($arg)*)
    };
}
