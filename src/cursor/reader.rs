//! Binary Reader
//!
//! Consumes typed primitives from a byte buffer.

use bytes::{Buf, Bytes};
use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, SaveError};
use crate::record::Serial;

use super::PrimitiveTag;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Sequential reader over an immutable byte buffer
///
/// Every read checks the remaining length first; running out of data is
/// reported as `SaveError::UnexpectedEndOfData` and never panics.
#[derive(Debug, Clone)]
pub struct BinaryReader {
    /// Source bytes
    data: Bytes,
    /// Current read position
    pos: usize,
    /// Expect a type tag ahead of every primitive
    tagged: bool,
}

impl BinaryReader {
    /// Create an untagged reader
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            tagged: false,
        }
    }

    /// Create a reader that verifies a type tag before each primitive
    pub fn tagged(data: impl Into<Bytes>) -> Self {
        Self {
            tagged: true,
            ..Self::new(data)
        }
    }

    /// Whether this reader verifies type tags
    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    // =========================================================================
    // Fixed-width primitives
    // =========================================================================

    pub fn read_bool(&mut self) -> Result<bool> {
        self.rewind_on_error(|r| match r.fixed(PrimitiveTag::Bool)?.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SaveError::CorruptRecord(format!(
                "invalid bool byte 0x{:02x} at offset {}",
                other,
                r.pos - 1
            ))),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.fixed(PrimitiveTag::U8)?.get_u8())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.fixed(PrimitiveTag::I16)?.get_i16_le())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.fixed(PrimitiveTag::I32)?.get_i32_le())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.fixed(PrimitiveTag::U32)?.get_u32_le())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.fixed(PrimitiveTag::I64)?.get_i64_le())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.fixed(PrimitiveTag::U64)?.get_u64_le())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.fixed(PrimitiveTag::F64)?.get_f64_le())
    }

    /// Read an entity identity
    pub fn read_serial(&mut self) -> Result<Serial> {
        Ok(Serial::new(self.fixed(PrimitiveTag::Serial)?.get_i32_le()))
    }

    /// Read a UTC timestamp stored as unix seconds plus subsecond nanoseconds
    pub fn read_datetime(&mut self) -> Result<DateTime<Utc>> {
        self.rewind_on_error(|r| {
            let mut raw = r.fixed(PrimitiveTag::DateTime)?;
            let (secs, nanos) = (raw.get_i64_le(), raw.get_u32_le());
            DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
                SaveError::CorruptRecord(format!("timestamp {}s {}ns out of range", secs, nanos))
            })
        })
    }

    /// Read a duration stored as whole seconds plus signed subsecond nanoseconds
    pub fn read_duration(&mut self) -> Result<Duration> {
        self.rewind_on_error(|r| {
            let mut raw = r.fixed(PrimitiveTag::Duration)?;
            let (secs, nanos) = (raw.get_i64_le(), raw.get_i32_le());
            Some(nanos)
                .filter(|n| n.unsigned_abs() < NANOS_PER_SEC)
                .and_then(|n| Duration::try_seconds(secs)?.checked_add(&Duration::nanoseconds(n.into())))
                .ok_or_else(|| {
                    SaveError::CorruptRecord(format!("duration {}s {}ns out of range", secs, nanos))
                })
        })
    }

    // =========================================================================
    // Variable-size primitives
    // =========================================================================

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<String> {
        self.rewind_on_error(|r| {
            let len = r.fixed(PrimitiveTag::Str)?.get_u32_le() as usize;
            let start = r.pos;
            let raw = r.take(len)?;
            String::from_utf8(raw.to_vec()).map_err(|_| {
                SaveError::CorruptRecord(format!("invalid UTF-8 string at offset {}", start))
            })
        })
    }

    /// Read a presence flag and, when set, the string that follows
    pub fn read_opt_string(&mut self) -> Result<Option<String>> {
        self.rewind_on_error(|r| {
            let flag = r.fixed(PrimitiveTag::OptStr)?.get_u8();
            match flag {
                0 => Ok(None),
                1 => r.read_string().map(Some),
                other => Err(SaveError::CorruptRecord(format!(
                    "invalid string presence flag 0x{:02x} at offset {}",
                    other,
                    r.pos - 1
                ))),
            }
        })
    }

    /// Read a length-prefixed byte blob (zero-copy slice of the source)
    pub fn read_bytes(&mut self) -> Result<Bytes> {
        self.rewind_on_error(|r| {
            let len = r.fixed(PrimitiveTag::Bytes)?.get_u32_le() as usize;
            r.ensure(len)?;
            let blob = r.data.slice(r.pos..r.pos + len);
            r.pos += len;
            Ok(blob)
        })
    }

    // =========================================================================
    // Positioning
    // =========================================================================

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the read position; positions past the end are rejected
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(SaveError::UnexpectedEndOfData {
                needed: pos - self.pos,
                remaining: self.remaining(),
                position: self.pos,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether every byte has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Verify the tag (in tagged mode) and take the fixed part of a primitive
    ///
    /// Nothing is consumed unless the tag matches and the whole fixed part
    /// is available.
    fn fixed(&mut self, tag: PrimitiveTag) -> Result<&[u8]> {
        let start = self.pos;
        if self.tagged {
            self.ensure(1)?;
            let found = self.data[start];
            if found != tag as u8 {
                return Err(SaveError::TypeMismatch {
                    expected: tag,
                    found,
                    position: start,
                });
            }
            self.pos += 1;
        }
        if let Err(e) = self.ensure(tag.fixed_width()) {
            self.pos = start;
            return Err(e);
        }
        self.take(tag.fixed_width())
    }

    /// Run a multi-part read, restoring the position if any part fails
    fn rewind_on_error<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.pos;
        let result = read(self);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(SaveError::UnexpectedEndOfData {
                needed,
                remaining: self.remaining(),
                position: self.pos,
            });
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&[u8]> {
        self.ensure(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..start + len])
    }
}
