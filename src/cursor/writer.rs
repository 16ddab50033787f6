//! Binary Writer
//!
//! Appends typed primitives to a growable buffer.

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Duration, Utc};

use crate::record::Serial;

use super::PrimitiveTag;

/// Sequential writer over a growable byte buffer
///
/// Writes land at the current position. Writing at the end appends;
/// writing after a `seek` back overwrites in place and extends the buffer
/// when it runs past the end.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    /// Output buffer
    buf: BytesMut,
    /// Current write position
    pos: usize,
    /// Emit a type tag ahead of every primitive
    tagged: bool,
}

impl BinaryWriter {
    /// Create an untagged writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an untagged writer with preallocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            pos: 0,
            tagged: false,
        }
    }

    /// Create a writer that emits a type tag before each primitive
    pub fn tagged() -> Self {
        Self {
            tagged: true,
            ..Self::default()
        }
    }

    /// Whether this writer emits type tags
    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    // =========================================================================
    // Fixed-width primitives
    // =========================================================================

    pub fn write_bool(&mut self, value: bool) {
        self.tag(PrimitiveTag::Bool);
        self.put(&[value as u8]);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.tag(PrimitiveTag::U8);
        self.put(&[value]);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.tag(PrimitiveTag::I16);
        self.put(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.tag(PrimitiveTag::I32);
        self.put(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.tag(PrimitiveTag::U32);
        self.put(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.tag(PrimitiveTag::I64);
        self.put(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.tag(PrimitiveTag::U64);
        self.put(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.tag(PrimitiveTag::F64);
        self.put(&value.to_le_bytes());
    }

    /// Write an entity identity
    pub fn write_serial(&mut self, serial: Serial) {
        self.tag(PrimitiveTag::Serial);
        self.put(&serial.value().to_le_bytes());
    }

    /// Write a UTC timestamp as unix seconds plus subsecond nanoseconds
    pub fn write_datetime(&mut self, value: DateTime<Utc>) {
        self.tag(PrimitiveTag::DateTime);
        self.put(&value.timestamp().to_le_bytes());
        self.put(&value.timestamp_subsec_nanos().to_le_bytes());
    }

    /// Write a duration as whole seconds plus signed subsecond nanoseconds
    pub fn write_duration(&mut self, value: Duration) {
        self.tag(PrimitiveTag::Duration);
        self.put(&value.num_seconds().to_le_bytes());
        self.put(&value.subsec_nanos().to_le_bytes());
    }

    // =========================================================================
    // Variable-size primitives
    // =========================================================================

    /// Write a length-prefixed UTF-8 string
    pub fn write_string(&mut self, value: &str) {
        self.tag(PrimitiveTag::Str);
        self.put(&(value.len() as u32).to_le_bytes());
        self.put(value.as_bytes());
    }

    /// Write a presence flag followed by the string when present
    pub fn write_opt_string(&mut self, value: Option<&str>) {
        self.tag(PrimitiveTag::OptStr);
        match value {
            Some(s) => {
                self.put(&[1]);
                self.write_string(s);
            }
            None => self.put(&[0]),
        }
    }

    /// Write a length-prefixed byte blob
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.tag(PrimitiveTag::Bytes);
        self.put(&(value.len() as u32).to_le_bytes());
        self.put(value);
    }

    // =========================================================================
    // Positioning
    // =========================================================================

    /// Current write position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the write position; positions past the end are clamped to it
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    /// Total bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Finish writing and hand the buffer off as immutable bytes
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Finish writing and return the mutable buffer
    pub fn into_inner(self) -> BytesMut {
        self.buf
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn tag(&mut self, tag: PrimitiveTag) {
        if self.tagged {
            self.put(&[tag as u8]);
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        if self.pos == self.buf.len() {
            self.buf.extend_from_slice(bytes);
        } else {
            if end > self.buf.len() {
                self.buf.resize(end, 0);
            }
            self.buf[self.pos..end].copy_from_slice(bytes);
        }
        self.pos = end;
    }
}
