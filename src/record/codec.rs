//! Component record encoding and decoding

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::{Result, SaveError};

use super::layout::{check_layout, Component};

/// Write `[VERSION][live fields in table order]`
pub fn write_component<C: Component>(component: &C, writer: &mut BinaryWriter) {
    debug_assert!(
        check_layout::<C>().is_ok(),
        "invalid field layout for {}",
        C::KIND
    );

    writer.write_i32(C::VERSION);
    for field in C::FIELDS.iter().filter(|f| !f.is_retired()) {
        field.write(component, writer);
    }
}

/// Read a component record written at any version in `[0, VERSION]`
///
/// The value is built from `C::default()`, so fields the stored version
/// lacks keep their legacy default. Nothing is returned unless every
/// present field decoded.
pub fn read_component<C: Component>(reader: &mut BinaryReader) -> Result<C> {
    let version = reader.read_i32()?;
    if !(0..=C::VERSION).contains(&version) {
        return Err(SaveError::version_out_of_range(C::KIND, version, C::VERSION));
    }

    let mut component = C::default();
    for field in C::FIELDS.iter().filter(|f| f.present_in(version)) {
        field.read(&mut component, reader)?;
    }
    Ok(component)
}

/// Leading version tag of a record, if the bytes hold one
pub fn peek_version(record: &[u8], tagged: bool) -> Option<i32> {
    let mut reader = if tagged {
        BinaryReader::tagged(record.to_vec())
    } else {
        BinaryReader::new(record.to_vec())
    };
    reader.read_i32().ok()
}
