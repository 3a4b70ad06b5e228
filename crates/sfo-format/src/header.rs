//! Fixed-size SFO structures: the file header and the section table

use std::io::{self, Read, Write};

use sfo_core::{Result, SfoError};

/// SFO magic signature
pub const PSF_MAGIC: &[u8; 4] = b"\x00PSF";

/// Version bytes written into newly created files (1.1)
pub const DEFAULT_VERSION: [u8; 4] = [0x01, 0x01, 0x00, 0x00];

/// Filler byte stored next to the type tag in newly created sections
pub const DEFAULT_SECTION_FILLER: u8 = 0x04;

/// SFO file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsfHeader {
    /// Magic signature (should be "\0PSF")
    pub magic: [u8; 4],
    /// Format version, carried through untouched
    pub version: [u8; 4],
    /// Absolute offset of the label block
    pub label_table_offset: i32,
    /// Absolute offset of the data block
    pub data_table_offset: i32,
    /// Number of section descriptors
    pub section_count: i32,
}

impl PsfHeader {
    /// Size of the header on disk
    pub const SIZE: usize = 20;

    /// Read a header, checking the magic before anything else
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => SfoError::format("File too short for SFO magic"),
            _ => SfoError::Io(e),
        })?;

        if &magic != PSF_MAGIC {
            return Err(SfoError::format(format!("Invalid SFO magic: {:02X?}", magic)));
        }

        let mut rest = [0u8; 16];
        reader.read_exact(&mut rest)?;

        Ok(Self {
            magic,
            version: [rest[0], rest[1], rest[2], rest[3]],
            label_table_offset: i32::from_le_bytes([rest[4], rest[5], rest[6], rest[7]]),
            data_table_offset: i32::from_le_bytes([rest[8], rest[9], rest[10], rest[11]]),
            section_count: i32::from_le_bytes([rest[12], rest[13], rest[14], rest[15]]),
        })
    }

    /// Write the header in little-endian layout
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version)?;
        writer.write_all(&self.label_table_offset.to_le_bytes())?;
        writer.write_all(&self.data_table_offset.to_le_bytes())?;
        writer.write_all(&self.section_count.to_le_bytes())?;
        Ok(())
    }
}

impl Default for PsfHeader {
    fn default() -> Self {
        Self {
            magic: *PSF_MAGIC,
            version: DEFAULT_VERSION,
            label_table_offset: PsfHeader::SIZE as i32,
            data_table_offset: PsfHeader::SIZE as i32,
            section_count: 0,
        }
    }
}

/// Section table entry describing one key/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Offset of the label within the label block
    pub label_offset: u16,
    /// Filler byte, carried through untouched
    pub filler: u8,
    /// Raw type tag
    pub data_type: u8,
    /// Bytes of value data actually used
    pub used_size: u32,
    /// `used_size` rounded up to a multiple of 4
    pub reserved_size: u32,
    /// Offset of the value within the data block
    pub data_offset: u32,
}

impl SectionDescriptor {
    /// Size of a section descriptor on disk
    pub const SIZE: usize = 16;

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;

        Ok(Self {
            label_offset: u16::from_le_bytes([buf[0], buf[1]]),
            filler: buf[2],
            data_type: buf[3],
            used_size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            reserved_size: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            data_offset: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.label_offset.to_le_bytes())?;
        writer.write_all(&[self.filler, self.data_type])?;
        writer.write_all(&self.used_size.to_le_bytes())?;
        writer.write_all(&self.reserved_size.to_le_bytes())?;
        writer.write_all(&self.data_offset.to_le_bytes())?;
        Ok(())
    }
}

impl Default for SectionDescriptor {
    fn default() -> Self {
        Self {
            label_offset: 0,
            filler: DEFAULT_SECTION_FILLER,
            data_type: 0,
            used_size: 0,
            reserved_size: 0,
            data_offset: 0,
        }
    }
}
