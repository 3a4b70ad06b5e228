//! SFO decoder and encoder
//!
//! File layout:
//! - Header (20 bytes)
//! - Section table (16 bytes per entry)
//! - Label block: NUL-terminated keys, padded to a multiple of 4
//! - Data block: values, each padded to a multiple of 4
//!
//! The encoder never reuses offsets from a previous decode; every offset and
//! size is recomputed from the entry list.

use std::io::{self, Read, Seek, SeekFrom};

use sfo_core::{sfo_debug, sfo_trace, Result, SfoError};

use crate::header::{PsfHeader, SectionDescriptor};
use crate::param::SfoEntry;
use crate::value::{DataType, SfoString, SfoValue};

/// Round `n` up to the next multiple of 4
pub fn align4(n: usize) -> usize {
    match n % 4 {
        0 => n,
        rem => n + (4 - rem),
    }
}

/// Decode a complete SFO image from a seekable reader
pub fn decode<R: Read + Seek>(reader: &mut R) -> Result<(PsfHeader, Vec<SfoEntry>)> {
    reader.seek(SeekFrom::Start(0))?;
    let header = PsfHeader::read_from(reader)?;

    let label_table = table_offset(header.label_table_offset, "label")?;
    let data_table = table_offset(header.data_table_offset, "data")?;
    let count = usize::try_from(header.section_count).map_err(|_| {
        SfoError::format(format!("Negative section count: {}", header.section_count))
    })?;

    sfo_debug!(
        "SFO header: version={:02X?} labels=0x{:X} data=0x{:X} sections={}",
        header.version,
        label_table,
        data_table,
        count
    );

    // Capacity is capped so a corrupt count cannot force a huge allocation
    let mut sections = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        sections.push(SectionDescriptor::read_from(reader)?);
    }

    let mut entries = Vec::with_capacity(sections.len());
    for (index, section) in sections.into_iter().enumerate() {
        reader.seek(SeekFrom::Start(label_table + u64::from(section.label_offset)))?;
        let label = SfoString::from(read_label(reader)?);

        reader.seek(SeekFrom::Start(data_table + u64::from(section.data_offset)))?;
        let payload = read_payload(reader, section.used_size)?;
        let value = decode_value(&label, section.data_type, payload)?;

        sfo_trace!(
            "section {}: {} type={} used={} reserved={} data=0x{:X}",
            index,
            label,
            section.data_type,
            section.used_size,
            section.reserved_size,
            section.data_offset
        );

        entries.push(SfoEntry {
            label,
            value,
            section,
        });
    }

    Ok((header, entries))
}

fn table_offset(offset: i32, name: &str) -> Result<u64> {
    u64::try_from(offset)
        .map_err(|_| SfoError::format(format!("Negative {} table offset: {}", name, offset)))
}

/// Read bytes up to, not including, a NUL terminator
fn read_label<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut label = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        reader.read_exact(&mut byte)?;
        if byte[0] == 0 {
            return Ok(label);
        }
        label.push(byte[0]);
    }
}

/// Read exactly `len` bytes without trusting `len` for the allocation
fn read_payload<R: Read>(reader: &mut R, len: u32) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    reader.take(u64::from(len)).read_to_end(&mut payload)?;
    if payload.len() != len as usize {
        return Err(SfoError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Value truncated: expected {} bytes, got {}", len, payload.len()),
        )));
    }
    Ok(payload)
}

fn decode_value(label: &SfoString, tag: u8, payload: Vec<u8>) -> Result<SfoValue> {
    match DataType::try_from(tag)? {
        DataType::Raw => Ok(SfoValue::Raw(payload)),
        DataType::Text => Ok(SfoValue::Text(SfoString::from(payload))),
        DataType::Integer => {
            let bytes: [u8; 4] = payload.as_slice().try_into().map_err(|_| {
                SfoError::format(format!(
                    "Integer {} has {} bytes, expected 4",
                    label,
                    payload.len()
                ))
            })?;
            Ok(SfoValue::Integer(i32::from_le_bytes(bytes)))
        }
    }
}

/// Result of encoding: the serialized image plus the layout it was built with
#[derive(Debug, Clone)]
pub struct EncodedSfo {
    pub header: PsfHeader,
    pub sections: Vec<SectionDescriptor>,
    pub bytes: Vec<u8>,
}

/// Encode `entries` under `header`'s magic and version
pub fn encode(header: &PsfHeader, entries: &[SfoEntry]) -> Result<EncodedSfo> {
    let section_count = i32::try_from(entries.len())
        .map_err(|_| SfoError::format(format!("Too many sections: {}", entries.len())))?;
    let label_table = PsfHeader::SIZE + entries.len() * SectionDescriptor::SIZE;

    let mut sections: Vec<SectionDescriptor> = entries
        .iter()
        .map(|entry| SectionDescriptor {
            filler: entry.section.filler,
            data_type: entry.value.data_type().into(),
            ..SectionDescriptor::default()
        })
        .collect();

    let mut labels = Vec::new();
    for (entry, section) in entries.iter().zip(sections.iter_mut()) {
        if entry.label.as_bytes().contains(&0) {
            return Err(SfoError::format(format!(
                "Label {:?} contains a NUL byte",
                entry.label
            )));
        }
        section.label_offset = u16::try_from(labels.len()).map_err(|_| {
            SfoError::format(format!("Label block too large at {:?}", entry.label))
        })?;
        labels.extend_from_slice(entry.label.as_bytes());
        labels.push(0);
    }
    labels.resize(align4(labels.len()), 0);
    let data_table = label_table + labels.len();

    let mut data = Vec::new();
    for (entry, section) in entries.iter().zip(sections.iter_mut()) {
        let start = data.len();
        entry.value.encode_into(&mut data);
        let used = data.len() - start;
        let reserved = align4(used);
        data.resize(start + reserved, 0);

        section.data_offset = wire_u32(start, "data offset")?;
        section.used_size = wire_u32(used, "value size")?;
        section.reserved_size = wire_u32(reserved, "value size")?;
    }

    let header = PsfHeader {
        magic: header.magic,
        version: header.version,
        label_table_offset: wire_i32(label_table, "label table offset")?,
        data_table_offset: wire_i32(data_table, "data table offset")?,
        section_count,
    };
    wire_i32(data_table + data.len(), "file size")?;

    let mut bytes = Vec::with_capacity(data_table + data.len());
    header.write_to(&mut bytes)?;
    for section in &sections {
        section.write_to(&mut bytes)?;
    }
    bytes.extend_from_slice(&labels);
    bytes.extend_from_slice(&data);

    sfo_debug!(
        "Encoded SFO: {} sections, labels=0x{:X} data=0x{:X}, {} bytes",
        section_count,
        label_table,
        data_table,
        bytes.len()
    );

    Ok(EncodedSfo {
        header,
        sections,
        bytes,
    })
}

// Sizes are capped at i32::MAX so the file stays addressable by the signed
// header offsets.
fn wire_u32(value: usize, what: &str) -> Result<u32> {
    wire_i32(value, what).map(|v| v as u32)
}

fn wire_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| SfoError::format(format!("{} overflows: {}", what, value)))
}
