//! Item components

use chrono::{DateTime, Utc};

use crate::error::SaveError;
use crate::record::{Component, Field};

/// World position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point3D {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

// =============================================================================
// ItemCore
// =============================================================================

/// State shared by every item
///
/// ## Versions
/// - v0: name, hue, amount, weight
/// - v1: weight dropped, location added
/// - v2: creation time added
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCore {
    pub name: Option<String>,
    pub hue: i32,
    pub amount: i32,
    pub location: Point3D,
    pub created: DateTime<Utc>,
}

impl Default for ItemCore {
    fn default() -> Self {
        Self {
            name: None,
            hue: 0,
            amount: 1,
            location: Point3D::default(),
            created: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl Component for ItemCore {
    const KIND: &'static str = "ItemCore";
    const VERSION: i32 = 2;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new(
            "name",
            0,
            |c, w| w.write_opt_string(c.name.as_deref()),
            |c, r| {
                c.name = r.read_opt_string()?;
                Ok(())
            },
        ),
        Field::new("hue", 0, |c, w| w.write_i32(c.hue), |c, r| {
            c.hue = r.read_i32()?;
            Ok(())
        }),
        Field::new("amount", 0, |c, w| w.write_i32(c.amount), |c, r| {
            c.amount = r.read_i32()?;
            Ok(())
        }),
        // Weight became a per-type constant in v1
        Field::retired("weight", 0, 1, |_, r| {
            r.read_i32()?;
            Ok(())
        }),
        Field::new(
            "location",
            1,
            |c, w| {
                w.write_i16(c.location.x);
                w.write_i16(c.location.y);
                w.write_i16(c.location.z);
            },
            |c, r| {
                c.location = Point3D {
                    x: r.read_i16()?,
                    y: r.read_i16()?,
                    z: r.read_i16()?,
                };
                Ok(())
            },
        ),
        Field::new("created", 2, |c, w| w.write_datetime(c.created), |c, r| {
            c.created = r.read_datetime()?;
            Ok(())
        }),
    ];
}

// =============================================================================
// Durability
// =============================================================================

/// Wear tracking for equipment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Durability {
    pub hits: i32,
    pub max_hits: i32,
}

impl Component for Durability {
    const KIND: &'static str = "Durability";
    const VERSION: i32 = 0;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("hits", 0, |c, w| w.write_i32(c.hits), |c, r| {
            c.hits = r.read_i32()?;
            Ok(())
        }),
        Field::new("max_hits", 0, |c, w| w.write_i32(c.max_hits), |c, r| {
            c.max_hits = r.read_i32()?;
            Ok(())
        }),
    ];
}

// =============================================================================
// Attributes
// =============================================================================

/// Stat bonuses granted while equipped
///
/// `bonus_int` arrived in v1; older records load it as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub bonus_hits: i32,
    pub bonus_str: i32,
    pub bonus_int: i32,
}

impl Component for Attributes {
    const KIND: &'static str = "Attributes";
    const VERSION: i32 = 1;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("bonus_hits", 0, |c, w| w.write_i32(c.bonus_hits), |c, r| {
            c.bonus_hits = r.read_i32()?;
            Ok(())
        }),
        Field::new("bonus_str", 0, |c, w| w.write_i32(c.bonus_str), |c, r| {
            c.bonus_str = r.read_i32()?;
            Ok(())
        }),
        Field::new("bonus_int", 1, |c, w| w.write_i32(c.bonus_int), |c, r| {
            c.bonus_int = r.read_i32()?;
            Ok(())
        }),
    ];
}

// =============================================================================
// Reforged
// =============================================================================

/// Name suffix applied by reforging
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReforgedSuffix {
    #[default]
    None = 0,
    Blackthorn = 1,
    Minax = 2,
    Fellowship = 3,
}

impl ReforgedSuffix {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ReforgedSuffix::None),
            1 => Some(ReforgedSuffix::Blackthorn),
            2 => Some(ReforgedSuffix::Minax),
            3 => Some(ReforgedSuffix::Fellowship),
            _ => None,
        }
    }
}

/// Reforging state of an artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reforged {
    pub suffix: ReforgedSuffix,
}

impl Component for Reforged {
    const KIND: &'static str = "Reforged";
    const VERSION: i32 = 0;
    const FIELDS: &'static [Field<Self>] = &[Field::new(
        "suffix",
        0,
        |c, w| w.write_u8(c.suffix as u8),
        |c, r| {
            let raw = r.read_u8()?;
            c.suffix = ReforgedSuffix::from_u8(raw).ok_or_else(|| {
                SaveError::CorruptRecord(format!("unknown reforged suffix {}", raw))
            })?;
            Ok(())
        },
    )];
}
