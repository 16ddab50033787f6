//! Tests for tagged cursors
//!
//! These tests verify:
//! - Tagged values read back through a tagged reader
//! - Reading a different primitive than was written fails with TypeMismatch
//! - Tags add one byte per primitive

use worldsave::cursor::{BinaryReader, BinaryWriter, PrimitiveTag};
use worldsave::SaveError;

#[test]
fn test_tagged_roundtrip() {
    let mut w = BinaryWriter::tagged();
    w.write_i32(-5);
    w.write_opt_string(Some("Skara Brae"));
    w.write_u64(12);
    assert!(w.is_tagged());

    let mut r = BinaryReader::tagged(w.freeze());
    assert_eq!(r.read_i32().unwrap(), -5);
    assert_eq!(r.read_opt_string().unwrap().as_deref(), Some("Skara Brae"));
    assert_eq!(r.read_u64().unwrap(), 12);
    assert!(r.is_exhausted());
}

#[test]
fn test_tag_overhead() {
    let mut w = BinaryWriter::tagged();
    w.write_i32(1);
    w.write_bool(true);
    assert_eq!(w.len(), (1 + 4) + (1 + 1));
    assert_eq!(w.as_slice()[0], PrimitiveTag::I32 as u8);
    assert_eq!(w.as_slice()[5], PrimitiveTag::Bool as u8);
}

#[test]
fn test_mismatched_read_fails() {
    let mut w = BinaryWriter::tagged();
    w.write_i32(1);
    w.write_i16(2);

    let mut r = BinaryReader::tagged(w.freeze());
    assert_eq!(r.read_i32().unwrap(), 1);
    match r.read_i32() {
        Err(SaveError::TypeMismatch {
            expected,
            found,
            position,
        }) => {
            assert_eq!(expected, PrimitiveTag::I32);
            assert_eq!(found, PrimitiveTag::I16 as u8);
            assert_eq!(position, 5);
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_mismatch_leaves_cursor_in_place() {
    let mut w = BinaryWriter::tagged();
    w.write_i16(2);
    w.write_string("moongate");

    let mut r = BinaryReader::tagged(w.freeze());
    assert!(matches!(r.read_i32(), Err(SaveError::TypeMismatch { .. })));
    assert_eq!(r.position(), 0);
    assert_eq!(r.read_i16().unwrap(), 2);

    let before = r.position();
    assert!(matches!(r.read_bytes(), Err(SaveError::TypeMismatch { .. })));
    assert!(matches!(r.read_opt_string(), Err(SaveError::TypeMismatch { .. })));
    assert_eq!(r.position(), before);
    assert_eq!(r.read_string().unwrap(), "moongate");
    assert!(r.is_exhausted());
}

#[test]
fn test_same_width_types_are_distinguished() {
    // u32 and i32 share a width; only the tag tells them apart
    let mut w = BinaryWriter::tagged();
    w.write_u32(7);

    let mut r = BinaryReader::tagged(w.freeze());
    assert!(matches!(r.read_i32(), Err(SaveError::TypeMismatch { .. })));
}

#[test]
fn test_string_read_as_blob_fails() {
    let mut w = BinaryWriter::tagged();
    w.write_string("abc");

    let mut r = BinaryReader::tagged(w.freeze());
    assert!(matches!(r.read_bytes(), Err(SaveError::TypeMismatch { .. })));
}

#[test]
fn test_truncated_after_tag() {
    let mut w = BinaryWriter::tagged();
    w.write_i64(99);
    let bytes = w.freeze();

    let mut r = BinaryReader::tagged(bytes.slice(0..4));
    assert!(matches!(
        r.read_i64(),
        Err(SaveError::UnexpectedEndOfData { needed: 8, remaining: 3, position: 1 })
    ));
    assert_eq!(r.position(), 0);
}

#[test]
fn test_truncated_string_body_leaves_cursor_in_place() {
    let mut w = BinaryWriter::tagged();
    w.write_string("Britain");
    let bytes = w.freeze();

    let mut r = BinaryReader::tagged(bytes.slice(0..bytes.len() - 1));
    assert!(matches!(r.read_string(), Err(SaveError::UnexpectedEndOfData { .. })));
    assert_eq!(r.position(), 0);
}
