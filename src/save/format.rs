//! Save file framing

use bytes::Bytes;

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::{Result, SaveError};
use crate::record::{Category, Serial};

/// Magic bytes identifying a world save file
pub const MAGIC: &[u8; 4] = b"WSAV";

/// Current save file format version
pub const FORMAT_VERSION: u16 = 1;

/// Header size: Magic (4) + Format (2) + Flags (1) + Category (1) = 8 bytes
pub const HEADER_SIZE: usize = 8;

/// Footer size: EntryCount (8) + EntriesCRC (4) = 12 bytes
pub const FOOTER_SIZE: usize = 12;

const FLAG_TYPE_TAGS: u8 = 0x01;

/// Decoded save file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub category: Category,
    pub type_tags: bool,
}

impl FileHeader {
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(MAGIC);
        header[4..6].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
        header[6] = if self.type_tags { FLAG_TYPE_TAGS } else { 0 };
        header[7] = self.category as u8;
        header
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(SaveError::SaveFile(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(SaveError::SaveFile(format!(
                "Invalid save file magic: expected WSAV, got {:?}",
                &bytes[0..4]
            )));
        }

        let format = u16::from_le_bytes([bytes[4], bytes[5]]);
        if format != FORMAT_VERSION {
            return Err(SaveError::SaveFile(format!(
                "Unsupported save file format: {}",
                format
            )));
        }

        let flags = bytes[6];
        if flags & !FLAG_TYPE_TAGS != 0 {
            return Err(SaveError::SaveFile(format!("Unknown header flags: 0x{:02x}", flags)));
        }

        let category = Category::from_u8(bytes[7]).ok_or_else(|| {
            SaveError::SaveFile(format!("Unknown category: 0x{:02x}", bytes[7]))
        })?;

        Ok(Self {
            category,
            type_tags: flags & FLAG_TYPE_TAGS != 0,
        })
    }
}

/// One framed entity record
#[derive(Debug, Clone)]
pub(crate) struct EntryFrame {
    pub serial: Serial,
    pub type_name: String,
    pub record: Bytes,
}

/// Frame a record: `[serial][type name][record len][record]`
pub(crate) fn encode_entry(writer: &mut BinaryWriter, serial: Serial, type_name: &str, record: &[u8]) {
    writer.write_serial(serial);
    writer.write_string(type_name);
    writer.write_bytes(record);
}

pub(crate) fn decode_entry(reader: &mut BinaryReader) -> Result<EntryFrame> {
    Ok(EntryFrame {
        serial: reader.read_serial()?,
        type_name: reader.read_string()?,
        record: reader.read_bytes()?,
    })
}

/// Encode the footer: entry count + CRC32 of the entry section
pub(crate) fn encode_footer(entry_count: u64, crc: u32) -> [u8; FOOTER_SIZE] {
    let mut footer = [0u8; FOOTER_SIZE];
    footer[0..8].copy_from_slice(&entry_count.to_le_bytes());
    footer[8..12].copy_from_slice(&crc.to_le_bytes());
    footer
}

pub(crate) fn decode_footer(bytes: &[u8]) -> Result<(u64, u32)> {
    if bytes.len() != FOOTER_SIZE {
        return Err(SaveError::SaveFile(format!(
            "Incomplete footer: expected {} bytes, got {}",
            FOOTER_SIZE,
            bytes.len()
        )));
    }
    let mut count = [0u8; 8];
    count.copy_from_slice(&bytes[0..8]);
    let mut crc = [0u8; 4];
    crc.copy_from_slice(&bytes[8..12]);
    Ok((u64::from_le_bytes(count), u32::from_le_bytes(crc)))
}
