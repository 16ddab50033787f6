//! Wearable items

use crate::persistent;
use crate::record::Serial;

use super::components::{Attributes, Durability, ItemCore, Reforged, ReforgedSuffix};

/// A plain kimono
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaleKimono {
    pub serial: Serial,
    pub item: ItemCore,
    pub durability: Durability,
    pub attributes: Attributes,
}

impl MaleKimono {
    pub fn new(serial: Serial) -> Self {
        Self {
            serial,
            item: ItemCore {
                name: Some("male kimono".to_string()),
                ..ItemCore::default()
            },
            durability: Durability {
                hits: 30,
                max_hits: 30,
            },
            attributes: Attributes::default(),
        }
    }
}

persistent! {
    MaleKimono,
    type_name = "MaleKimono",
    category = Item,
    components = [item: ItemCore, durability: Durability, attributes: Attributes],
}

/// Reforged artifact kimono bearing the crest of Blackthorn
///
/// Extends the kimono layout with a trailing `Reforged` record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlackthornKimono {
    pub serial: Serial,
    pub item: ItemCore,
    pub durability: Durability,
    pub attributes: Attributes,
    pub reforged: Reforged,
}

impl BlackthornKimono {
    pub const INIT_HITS: i32 = 255;
    pub const HUE: i32 = 132;

    pub fn new(serial: Serial) -> Self {
        Self {
            serial,
            item: ItemCore {
                name: Some("male kimono bearing the crest of Blackthorn".to_string()),
                hue: Self::HUE,
                ..ItemCore::default()
            },
            durability: Durability {
                hits: Self::INIT_HITS,
                max_hits: Self::INIT_HITS,
            },
            attributes: Attributes {
                bonus_hits: 3,
                bonus_int: 5,
                ..Attributes::default()
            },
            reforged: Reforged {
                suffix: ReforgedSuffix::Blackthorn,
            },
        }
    }

    pub fn is_artifact(&self) -> bool {
        true
    }
}

persistent! {
    BlackthornKimono,
    type_name = "BlackthornKimono",
    category = Item,
    components = [
        item: ItemCore,
        durability: Durability,
        attributes: Attributes,
        reforged: Reforged,
    ],
}
