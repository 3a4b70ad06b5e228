//! PARAM.SFO reader and writer
//!
//! SFO files store a small ordered key/value table: a header, a section
//! table, a block of NUL-terminated labels and a block of 4-byte aligned
//! values. Values are raw bytes, text or 32-bit integers.

pub mod codec;
pub mod header;
pub mod param;
pub mod value;

pub use codec::align4;
pub use header::{PsfHeader, SectionDescriptor, PSF_MAGIC};
pub use param::{ParamSfo, SfoEntry};
pub use value::{DataType, SfoString, SfoValue};
pub use sfo_core::{Result, SfoError};
