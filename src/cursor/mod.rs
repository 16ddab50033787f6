//! Binary Cursor Module
//!
//! Sequential typed reader/writer primitives over a byte buffer.
//!
//! ## Responsibilities
//! - Fixed-width little-endian integers and floats
//! - Length-prefixed strings and byte blobs
//! - Timestamps and durations at nanosecond precision
//! - Positional seeking on both sides
//!
//! ## Primitive Encodings
//! ```text
//! bool / u8          1 byte
//! i16                2 bytes LE
//! i32 / u32 / serial 4 bytes LE
//! i64 / u64 / f64    8 bytes LE
//! datetime           [secs: i64 LE][subsec nanos: u32 LE]
//! duration           [secs: i64 LE][subsec nanos: i32 LE]
//! string             [len: u32][UTF-8 bytes]
//! opt string         [present: bool][string]?
//! bytes              [len: u32][raw bytes]
//! ```
//!
//! With type tags enabled every primitive is preceded by one
//! [`PrimitiveTag`] byte, and readers reject mismatches with
//! `SaveError::TypeMismatch` instead of reinterpreting bytes.

mod reader;
mod writer;

pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Type tag written ahead of each primitive in tagged mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTag {
    Bool = 0x01,
    U8 = 0x02,
    I16 = 0x03,
    I32 = 0x04,
    U32 = 0x05,
    I64 = 0x06,
    U64 = 0x07,
    F64 = 0x08,
    Str = 0x09,
    OptStr = 0x0a,
    Bytes = 0x0b,
    DateTime = 0x0c,
    Duration = 0x0d,
    Serial = 0x0e,
}

impl PrimitiveTag {
    /// Width in bytes of the fixed part of the primitive (length prefix for
    /// variable-size values)
    pub fn fixed_width(self) -> usize {
        match self {
            PrimitiveTag::Bool | PrimitiveTag::U8 | PrimitiveTag::OptStr => 1,
            PrimitiveTag::I16 => 2,
            PrimitiveTag::I32
            | PrimitiveTag::U32
            | PrimitiveTag::Serial
            | PrimitiveTag::Str
            | PrimitiveTag::Bytes => 4,
            PrimitiveTag::I64 | PrimitiveTag::U64 | PrimitiveTag::F64 => 8,
            PrimitiveTag::DateTime | PrimitiveTag::Duration => 12,
        }
    }
}
