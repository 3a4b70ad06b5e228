//! Error types for SFO handling

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading, editing or writing an SFO file
#[derive(Error, Debug)]
pub enum SfoError {
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SFO format: {0}")]
    Format(String),

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot parse {input:?} as an integer: {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedType(u8),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SfoError {
    /// Create a format error from any message
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a configuration error from any message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type used across param-sfo
pub type Result<T> = std::result::Result<T, SfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SfoError::IndexOutOfRange { index: 3, len: 3 };
        assert_eq!(err.to_string(), "Index 3 out of range (length 3)");

        let err = SfoError::NotFound("TITLE".to_string());
        assert_eq!(err.to_string(), "Key not found: TITLE");

        let err = SfoError::UnsupportedType(7);
        assert_eq!(err.to_string(), "Unsupported data type: 7");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: SfoError = io.into();
        assert!(matches!(err, SfoError::Io(_)));
    }

    #[test]
    fn test_parse_error_source() {
        let source = "abc".parse::<i32>().unwrap_err();
        let err = SfoError::Parse {
            input: "abc".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("\"abc\""));
    }
}
