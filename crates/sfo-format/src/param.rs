//! PARAM.SFO file model
//!
//! `ParamSfo` holds the decoded entries in file order. Lookups by key scan in
//! order and return the first match; lookups by position are bounds-checked.

use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use sfo_core::{sfo_debug, Result, SfoError};

use crate::codec;
use crate::header::{PsfHeader, SectionDescriptor};
use crate::value::{DataType, SfoString, SfoValue};

/// One key/value pair together with its section descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfoEntry {
    /// Key bytes, without the terminator
    pub label: SfoString,
    /// Typed value
    pub value: SfoValue,
    /// Descriptor from the last decode or save
    pub section: SectionDescriptor,
}

impl SfoEntry {
    /// Create an entry with a fresh section descriptor
    pub fn new(label: impl Into<SfoString>, value: SfoValue) -> Self {
        // Oversized values saturate here; encoding rejects them
        let used = value.encoded_len();
        let section = SectionDescriptor {
            data_type: value.data_type().into(),
            used_size: u32::try_from(used).unwrap_or(u32::MAX),
            reserved_size: u32::try_from(codec::align4(used)).unwrap_or(u32::MAX),
            ..SectionDescriptor::default()
        };
        Self {
            label: label.into(),
            value,
            section,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }
}

/// In-memory PARAM.SFO
#[derive(Debug, Clone, Default)]
pub struct ParamSfo {
    header: PsfHeader,
    entries: Vec<SfoEntry>,
    path: Option<PathBuf>,
}

impl ParamSfo {
    /// Create an empty SFO with a default header
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and decode an SFO file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SfoError::NotAFile(path.to_path_buf()),
            _ => SfoError::Io(e),
        })?;
        if !metadata.is_file() {
            return Err(SfoError::NotAFile(path.to_path_buf()));
        }

        let mut reader = BufReader::new(File::open(path)?);
        let mut sfo = Self::parse(&mut reader)?;
        sfo.path = Some(path.to_path_buf());

        sfo_debug!("Opened {} ({} entries)", path.display(), sfo.len());
        Ok(sfo)
    }

    /// Decode an SFO image from a reader
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let (header, entries) = codec::decode(reader)?;
        Ok(Self {
            header,
            entries,
            path: None,
        })
    }

    /// Decode an SFO image held in memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(&mut Cursor::new(data))
    }

    /// Encode the current entries into a complete SFO image
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(codec::encode(&self.header, &self.entries)?.bytes)
    }

    /// Write the SFO back to the file it was opened from
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| SfoError::NotAFile(PathBuf::new()))?;
        self.write_to_path(&path)
    }

    /// Write the SFO to `path` and make it the backing file
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(SfoError::NotAFile(path.to_path_buf()));
        }
        self.write_to_path(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_to_path(&mut self, path: &Path) -> Result<()> {
        // The whole image is built before the destination is touched
        let encoded = codec::encode(&self.header, &self.entries)?;
        fs::write(path, &encoded.bytes)?;

        self.header = encoded.header;
        for (entry, section) in self.entries.iter_mut().zip(encoded.sections) {
            entry.section = section;
        }

        sfo_debug!("Saved {} ({} bytes)", path.display(), encoded.bytes.len());
        Ok(())
    }

    pub fn header(&self) -> &PsfHeader {
        &self.header
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SfoEntry> {
        self.entries.iter()
    }

    pub fn entry(&self, index: usize) -> Result<&SfoEntry> {
        let len = self.entries.len();
        self.entries
            .get(index)
            .ok_or(SfoError::IndexOutOfRange { index, len })
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut SfoEntry> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(SfoError::IndexOutOfRange { index, len })
    }

    /// Position of the first entry labelled `key`
    pub fn position<K: AsRef<[u8]>>(&self, key: K) -> Option<usize> {
        let key = key.as_ref();
        self.entries.iter().position(|e| e.label.as_bytes() == key)
    }

    /// Value of the first entry labelled `key`
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<&SfoValue> {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|e| e.label.as_bytes() == key)
            .map(|e| &e.value)
            .ok_or_else(|| SfoError::NotFound(String::from_utf8_lossy(key).into_owned()))
    }

    /// Get a text value without its terminator
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).ok()?.as_str()
    }

    /// Get an integer value
    pub fn get_integer(&self, key: &str) -> Option<i32> {
        self.get(key).ok()?.as_integer()
    }

    pub fn value(&self, index: usize) -> Result<&SfoValue> {
        self.entry(index).map(|e| &e.value)
    }

    pub fn key(&self, index: usize) -> Result<&SfoString> {
        self.entry(index).map(|e| &e.label)
    }

    pub fn data_type(&self, index: usize) -> Result<DataType> {
        self.entry(index).map(SfoEntry::data_type)
    }

    /// Replace a value outright; the type follows the new value
    pub fn set_value(&mut self, index: usize, value: SfoValue) -> Result<()> {
        self.entry_mut(index)?.value = value;
        Ok(())
    }

    /// Set a value from text, interpreted according to the entry's current type.
    ///
    /// Text values gain a trailing NUL if they do not already end in one.
    /// Integers are parsed as decimal; on failure the entry is left unchanged.
    pub fn set_value_from_str(&mut self, index: usize, text: &str) -> Result<()> {
        let entry = self.entry_mut(index)?;
        entry.value = match entry.value.data_type() {
            DataType::Raw => SfoValue::Raw(text.as_bytes().to_vec()),
            DataType::Text => {
                let mut text = SfoString::from(text);
                if !text.ends_with_nul() {
                    text.push(0);
                }
                SfoValue::Text(text)
            }
            DataType::Integer => {
                let value = text.trim().parse::<i32>().map_err(|source| SfoError::Parse {
                    input: text.to_string(),
                    source,
                })?;
                SfoValue::Integer(value)
            }
        };
        Ok(())
    }

    /// Replace the label of an entry
    pub fn set_label(&mut self, index: usize, label: impl Into<SfoString>) -> Result<()> {
        self.entry_mut(index)?.label = label.into();
        Ok(())
    }

    /// Append a new entry and return its position
    pub fn insert(&mut self, label: impl Into<SfoString>, value: SfoValue) -> usize {
        self.entries.push(SfoEntry::new(label, value));
        self.sync_count();
        self.entries.len() - 1
    }

    /// Remove the entry at `index`
    pub fn remove(&mut self, index: usize) -> Result<SfoEntry> {
        self.entry(index)?;
        let entry = self.entries.remove(index);
        self.sync_count();
        Ok(entry)
    }

    fn sync_count(&mut self) {
        // Entry counts beyond i32 are rejected when encoding
        self.header.section_count = i32::try_from(self.entries.len()).unwrap_or(i32::MAX);
    }
}
