//! Tests for schema evolution
//!
//! These tests verify:
//! - Records written by an older schema load under a newer one
//! - Fields a record lacks keep their legacy default
//! - Versions outside the known range are rejected
//! - Retired fields are consumed but never written
//! - Broken field tables are caught by layout checks

use worldsave::cursor::{BinaryReader, BinaryWriter};
use worldsave::record::{check_layout, peek_version, read_component, write_component, Component, Field};
use worldsave::SaveError;

// =============================================================================
// Test Components
// =============================================================================

/// Armor wear as first shipped
#[derive(Debug, Default, PartialEq)]
struct ArmorV0 {
    hits: i32,
}

impl Component for ArmorV0 {
    const KIND: &'static str = "Armor";
    const VERSION: i32 = 0;
    const FIELDS: &'static [Field<Self>] = &[Field::new("hits", 0, |c, w| w.write_i32(c.hits), |c, r| {
        c.hits = r.read_i32()?;
        Ok(())
    })];
}

/// The same armor after an intelligence bonus was added
#[derive(Debug, Default, PartialEq)]
struct ArmorV1 {
    hits: i32,
    bonus_int: i32,
}

impl Component for ArmorV1 {
    const KIND: &'static str = "Armor";
    const VERSION: i32 = 1;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("hits", 0, |c, w| w.write_i32(c.hits), |c, r| {
            c.hits = r.read_i32()?;
            Ok(())
        }),
        Field::new("bonus_int", 1, |c, w| w.write_i32(c.bonus_int), |c, r| {
            c.bonus_int = r.read_i32()?;
            Ok(())
        }),
    ];
}

/// Version 2 folded a legacy weight into `encumbrance`
#[derive(Debug, PartialEq)]
struct Pack {
    label: String,
    encumbrance: i32,
}

impl Default for Pack {
    fn default() -> Self {
        Self {
            label: "pack".to_string(),
            encumbrance: 10,
        }
    }
}

impl Component for Pack {
    const KIND: &'static str = "Pack";
    const VERSION: i32 = 2;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("label", 0, |c, w| w.write_string(&c.label), |c, r| {
            c.label = r.read_string()?;
            Ok(())
        }),
        Field::retired("weight", 0, 2, |c, r| {
            c.encumbrance = r.read_i32()? * 2;
            Ok(())
        }),
        Field::new("encumbrance", 2, |c, w| w.write_i32(c.encumbrance), |c, r| {
            c.encumbrance = r.read_i32()?;
            Ok(())
        }),
    ];
}

/// Lists a field out of version order
#[derive(Default)]
struct Misordered {
    a: i32,
}

impl Component for Misordered {
    const KIND: &'static str = "Misordered";
    const VERSION: i32 = 2;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("late", 2, |c, w| w.write_i32(c.a), |c, r| {
            c.a = r.read_i32()?;
            Ok(())
        }),
        Field::new("early", 1, |c, w| w.write_i32(c.a), |c, r| {
            c.a = r.read_i32()?;
            Ok(())
        }),
    ];
}

// =============================================================================
// Upgrade Tests
// =============================================================================

#[test]
fn test_v0_record_loads_under_v1() {
    let mut w = BinaryWriter::new();
    write_component(&ArmorV0 { hits: 255 }, &mut w);
    let bytes = w.freeze();
    assert_eq!(bytes.len(), 8);

    let mut r = BinaryReader::new(bytes);
    let armor: ArmorV1 = read_component(&mut r).unwrap();
    assert_eq!(armor, ArmorV1 { hits: 255, bonus_int: 0 });
    assert!(r.is_exhausted());
}

#[test]
fn test_current_version_roundtrip() {
    let armor = ArmorV1 { hits: 40, bonus_int: 5 };
    let mut w = BinaryWriter::new();
    write_component(&armor, &mut w);

    let mut r = BinaryReader::new(w.freeze());
    assert_eq!(read_component::<ArmorV1>(&mut r).unwrap(), armor);
}

#[test]
fn test_retired_field_migrates_and_is_not_written() {
    let mut legacy = BinaryWriter::new();
    legacy.write_i32(1);
    legacy.write_string("satchel");
    legacy.write_i32(3);

    let mut r = BinaryReader::new(legacy.freeze());
    let pack: Pack = read_component(&mut r).unwrap();
    assert!(r.is_exhausted());
    assert_eq!(
        pack,
        Pack {
            label: "satchel".to_string(),
            encumbrance: 6
        }
    );

    let mut current = BinaryWriter::new();
    write_component(&pack, &mut current);
    // version + label + encumbrance, no weight slot
    assert_eq!(current.len(), 4 + (4 + 7) + 4);

    let mut r = BinaryReader::new(current.freeze());
    assert_eq!(read_component::<Pack>(&mut r).unwrap(), pack);
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test]
fn test_future_version_rejected() {
    let mut w = BinaryWriter::new();
    write_component(&ArmorV1 { hits: 1, bonus_int: 1 }, &mut w);

    let mut r = BinaryReader::new(w.freeze());
    match read_component::<ArmorV0>(&mut r) {
        Err(SaveError::CorruptRecord(msg)) => assert!(msg.contains("Armor version 1")),
        other => panic!("expected CorruptRecord, got {:?}", other),
    }
}

#[test]
fn test_negative_version_rejected() {
    let mut w = BinaryWriter::new();
    w.write_i32(-1);
    w.write_i32(100);

    let mut r = BinaryReader::new(w.freeze());
    assert!(matches!(
        read_component::<ArmorV1>(&mut r),
        Err(SaveError::CorruptRecord(_))
    ));
}

#[test]
fn test_truncated_after_version() {
    let mut w = BinaryWriter::new();
    w.write_i32(1);
    w.write_i32(255);

    let mut r = BinaryReader::new(w.freeze());
    assert!(matches!(
        read_component::<ArmorV1>(&mut r),
        Err(SaveError::UnexpectedEndOfData { needed: 4, remaining: 0, position: 8 })
    ));
}

#[test]
fn test_peek_version() {
    let mut w = BinaryWriter::tagged();
    write_component(&ArmorV1::default(), &mut w);
    let bytes = w.freeze();

    assert_eq!(peek_version(&bytes, true), Some(1));
    assert_eq!(peek_version(&bytes[..3], true), None);
    assert_eq!(peek_version(&[], false), None);
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_layout_checks() {
    check_layout::<ArmorV0>().unwrap();
    check_layout::<ArmorV1>().unwrap();
    check_layout::<Pack>().unwrap();
    assert!(matches!(
        check_layout::<Misordered>(),
        Err(SaveError::InvalidLayout(_))
    ));
}
