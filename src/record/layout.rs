//! Component field tables
//!
//! A component declares its schema as an ordered table of fields, each
//! tagged with the version that introduced it. Reading a record applies
//! exactly the entries present at the stored version, in table order.

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::{Result, SaveError};

/// Writes one field of `T`
pub type WriteFn<T> = fn(&T, &mut BinaryWriter);

/// Reads one field into `T`
pub type ReadFn<T> = fn(&mut T, &mut BinaryReader) -> Result<()>;

/// One entry of a component's field table
pub struct Field<T: 'static> {
    /// Field name (diagnostics only)
    pub name: &'static str,
    /// Version that introduced the field
    pub since: i32,
    /// Version that stopped writing the field, if retired
    pub until: Option<i32>,
    write: Option<WriteFn<T>>,
    read: ReadFn<T>,
}

impl<T: 'static> Field<T> {
    /// A field written by the current schema
    pub const fn new(name: &'static str, since: i32, write: WriteFn<T>, read: ReadFn<T>) -> Self {
        Self {
            name,
            since,
            until: None,
            write: Some(write),
            read,
        }
    }

    /// A field present in records from `since` up to (excluding) `until`
    ///
    /// Never written. Its reader consumes the legacy bytes and may migrate
    /// them into current fields.
    pub const fn retired(name: &'static str, since: i32, until: i32, read: ReadFn<T>) -> Self {
        Self {
            name,
            since,
            until: Some(until),
            write: None,
            read,
        }
    }

    /// Whether a record stored at `version` contains this field
    pub fn present_in(&self, version: i32) -> bool {
        self.since <= version && self.until.map_or(true, |until| version < until)
    }

    pub fn is_retired(&self) -> bool {
        self.until.is_some()
    }

    pub(crate) fn write(&self, value: &T, writer: &mut BinaryWriter) {
        if let Some(write) = self.write {
            write(value, writer);
        }
    }

    pub(crate) fn read(&self, value: &mut T, reader: &mut BinaryReader) -> Result<()> {
        (self.read)(value, reader)
    }
}

/// A serializable piece of an entity with its own schema version
///
/// `Default` supplies the legacy default for every field a given record
/// version does not contain.
pub trait Component: Default + 'static {
    /// Name used in diagnostics
    const KIND: &'static str;

    /// Current schema version
    const VERSION: i32;

    /// Field table, append-only across versions
    const FIELDS: &'static [Field<Self>];
}

/// Verify that a component's field table obeys the evolution rules
///
/// - `VERSION` is non-negative
/// - entries are appended in non-decreasing `since` order
/// - no entry is newer than `VERSION`
/// - retired entries satisfy `since < until <= VERSION` and have no writer
/// - live entries have a writer
pub fn check_layout<C: Component>() -> Result<()> {
    let invalid = |detail: String| SaveError::InvalidLayout(format!("{}: {}", C::KIND, detail));

    if C::VERSION < 0 {
        return Err(invalid(format!("negative version {}", C::VERSION)));
    }

    let mut last_since = 0;
    for field in C::FIELDS {
        if field.since < last_since {
            return Err(invalid(format!(
                "field '{}' (since {}) listed after a field from version {}",
                field.name, field.since, last_since
            )));
        }
        if field.since < 0 || field.since > C::VERSION {
            return Err(invalid(format!(
                "field '{}' introduced at version {} outside [0, {}]",
                field.name,
                field.since,
                C::VERSION
            )));
        }
        match field.until {
            Some(until) => {
                if until <= field.since || until > C::VERSION {
                    return Err(invalid(format!(
                        "retired field '{}' has invalid range [{}, {})",
                        field.name, field.since, until
                    )));
                }
                if field.write.is_some() {
                    return Err(invalid(format!("retired field '{}' has a writer", field.name)));
                }
            }
            None => {
                if field.write.is_none() {
                    return Err(invalid(format!("live field '{}' has no writer", field.name)));
                }
            }
        }
        last_since = field.since;
    }

    Ok(())
}
