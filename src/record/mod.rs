//! Record Module
//!
//! The versioned record contract every persistent entity implements.
//!
//! ## Record Format
//! ```text
//! ┌──────────────┬────────────────────────────────────────┐
//! │ Version (4)  │ Fields present at that version, in     │
//! │              │ field-table order                      │
//! └──────────────┴────────────────────────────────────────┘
//! ```
//!
//! An entity is an ordered list of components. Each component writes its
//! own record, base component first, so an entity's bytes are the
//! concatenation of its components' records:
//!
//! ```text
//! [ItemCore v][fields...][Durability v][fields...][Attributes v][fields...]
//! ```
//!
//! No length prefix, magic or checksum belongs to a record; framing is the
//! save file's job.
//!
//! ## Schema Evolution
//! - Field tables are append-only: a new field gets `since = VERSION + 1`
//!   and the component's `VERSION` is bumped.
//! - A field that is no longer written becomes `Field::retired`, keeping its
//!   slot so old records still decode.
//! - Records with a version above `VERSION` (or below 0) are rejected.

mod codec;
mod entity;
mod layout;

use std::fmt;

pub use codec::{peek_version, read_component, write_component};
pub use entity::{Persistent, Spawn};
pub use layout::{check_layout, Component, Field, ReadFn, WriteFn};

/// Stable identity of a persistent entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Serial(i32);

impl Serial {
    pub const ZERO: Serial = Serial(0);

    pub const fn new(value: i32) -> Self {
        Serial(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl From<i32> for Serial {
    fn from(value: i32) -> Self {
        Serial(value)
    }
}

/// Save category an entity is persisted and counted under
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Item = 0x01,
    Mobile = 0x02,
    Guild = 0x03,
    Data = 0x04,
}

impl Category {
    /// All categories, in save order
    pub const ALL: [Category; 4] = [
        Category::Item,
        Category::Mobile,
        Category::Guild,
        Category::Data,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Category::Item),
            0x02 => Some(Category::Mobile),
            0x03 => Some(Category::Guild),
            0x04 => Some(Category::Data),
            _ => None,
        }
    }

    /// Save file holding this category's records
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Item => "items.bin",
            Category::Mobile => "mobiles.bin",
            Category::Guild => "guilds.bin",
            Category::Data => "data.bin",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Item => "item",
            Category::Mobile => "mobile",
            Category::Guild => "guild",
            Category::Data => "data",
        };
        f.write_str(name)
    }
}
