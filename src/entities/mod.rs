//! Entities Module
//!
//! Representative content written against the record contract. Gameplay
//! rules live elsewhere; these types only carry persistent state.
//!
//! | Entity             | Category | Components                                   |
//! |--------------------|----------|----------------------------------------------|
//! | `MaleKimono`       | Item     | ItemCore, Durability, Attributes             |
//! | `BlackthornKimono` | Item     | ItemCore, Durability, Attributes, Reforged   |
//! | `Mobile`           | Mobile   | MobileCore                                   |
//! | `Guild`            | Guild    | GuildCore                                    |
//! | `DataObject`       | Data     | DataCore                                     |

mod components;
mod data;
mod guild;
mod items;
mod mobile;

pub use components::{Attributes, Durability, ItemCore, Point3D, Reforged, ReforgedSuffix};
pub use data::{DataCore, DataObject};
pub use guild::{Guild, GuildCore};
pub use items::{BlackthornKimono, MaleKimono};
pub use mobile::{Mobile, MobileCore};

use crate::save::TypeRegistry;

/// Register a constructor for every entity type in this module
pub fn register_all(registry: &mut TypeRegistry) {
    registry.register::<MaleKimono>();
    registry.register::<BlackthornKimono>();
    registry.register::<Mobile>();
    registry.register::<Guild>();
    registry.register::<DataObject>();
}
