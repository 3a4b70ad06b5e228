//! SFO value types

use std::borrow::Cow;
use std::fmt;

use sfo_core::SfoError;

/// Type tag stored in each section descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Raw bytes
    Raw = 0,
    /// Text, terminator included when present on disk
    Text = 2,
    /// Little-endian signed 32-bit integer
    Integer = 4,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Text => "text",
            Self::Integer => "integer",
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = SfoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Raw),
            2 => Ok(Self::Text),
            4 => Ok(Self::Integer),
            other => Err(SfoError::UnsupportedType(other)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        value as u8
    }
}

/// Byte string used for labels and text values.
///
/// Bytes are kept exactly as stored on disk; retail files are UTF-8 but the
/// format does not require it.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct SfoString(Vec<u8>);

impl SfoString {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Contents as `&str`, if they are valid UTF-8
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Contents with invalid UTF-8 replaced
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Contents without trailing NUL terminators
    pub fn trim_nul(&self) -> &[u8] {
        let end = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        &self.0[..end]
    }

    pub fn ends_with_nul(&self) -> bool {
        self.0.last() == Some(&0)
    }

    pub fn push(&mut self, byte: u8) {
        self.0.push(byte);
    }
}

impl From<&str> for SfoString {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for SfoString {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&[u8]> for SfoString {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<u8>> for SfoString {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for SfoString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<str> for SfoString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for SfoString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for SfoString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_string_lossy())
    }
}

impl fmt::Debug for SfoString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

/// Decoded value of an SFO entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SfoValue {
    Raw(Vec<u8>),
    Text(SfoString),
    Integer(i32),
}

impl SfoValue {
    /// Text value holding `text` verbatim
    pub fn text(text: impl Into<SfoString>) -> Self {
        Self::Text(text.into())
    }

    /// Type tag matching this value
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Raw(_) => DataType::Raw,
            Self::Text(_) => DataType::Text,
            Self::Integer(_) => DataType::Integer,
        }
    }

    /// Number of bytes this value occupies on disk, before padding
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Raw(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
            Self::Integer(_) => 4,
        }
    }

    /// Append the wire form of this value to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Raw(bytes) => out.extend_from_slice(bytes),
            Self::Text(text) => out.extend_from_slice(text.as_bytes()),
            Self::Integer(value) => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    /// Text content without trailing terminators, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => std::str::from_utf8(text.trim_nul()).ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&SfoString> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Display for SfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(bytes) => {
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Self::Text(text) => f.write_str(&String::from_utf8_lossy(text.trim_nul())),
            Self::Integer(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_conversion() {
        assert_eq!(DataType::try_from(0).unwrap(), DataType::Raw);
        assert_eq!(DataType::try_from(2).unwrap(), DataType::Text);
        assert_eq!(DataType::try_from(4).unwrap(), DataType::Integer);
        assert!(matches!(DataType::try_from(1), Err(SfoError::UnsupportedType(1))));
        assert!(matches!(DataType::try_from(0xFF), Err(SfoError::UnsupportedType(0xFF))));
        assert_eq!(u8::from(DataType::Integer), 4);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(SfoValue::Raw(vec![1, 2, 3]).encoded_len(), 3);
        assert_eq!(SfoValue::text("Game\0").encoded_len(), 5);
        assert_eq!(SfoValue::Integer(-1).encoded_len(), 4);
    }

    #[test]
    fn test_encode_into() {
        let mut out = Vec::new();
        SfoValue::Integer(1).encode_into(&mut out);
        SfoValue::text("ab").encode_into(&mut out);
        assert_eq!(out, [1, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn test_display() {
        assert_eq!(SfoValue::text("Game\0").to_string(), "Game");
        assert_eq!(SfoValue::Integer(-5).to_string(), "-5");
        assert_eq!(SfoValue::Raw(vec![0xDE, 0xAD, 0x01]).to_string(), "dead01");
    }

    #[test]
    fn test_non_utf8_text() {
        let value = SfoValue::text(&b"Caf\xE9\0"[..]);
        assert_eq!(value.encoded_len(), 5);
        assert_eq!(value.as_str(), None);
        assert_eq!(value.to_string(), "Caf\u{FFFD}");

        let mut out = Vec::new();
        value.encode_into(&mut out);
        assert_eq!(out, b"Caf\xE9\0");
    }

    #[test]
    fn test_sfo_string() {
        let mut label = SfoString::from("TITLE");
        assert_eq!(label, "TITLE");
        assert_eq!(label.to_str(), Some("TITLE"));
        assert_eq!(format!("[{:7}]", label), "[TITLE  ]");
        assert!(!label.ends_with_nul());

        label.push(0);
        label.push(0);
        assert!(label.ends_with_nul());
        assert_eq!(label.trim_nul(), b"TITLE");
        assert_eq!(SfoString::from(vec![0u8, 0]).trim_nul(), b"");
    }

    #[test]
    fn test_accessors() {
        let text = SfoValue::text("BLUS00001\0");
        assert_eq!(text.as_str(), Some("BLUS00001"));
        assert_eq!(text.as_integer(), None);
        assert_eq!(SfoValue::Integer(7).as_integer(), Some(7));
        assert_eq!(SfoValue::Raw(vec![9]).as_bytes(), Some(&[9u8][..]));
    }
}
