//! Persistent entities
//!
//! Entities are declared as an ordered list of components with the
//! [`persistent!`](crate::persistent) macro. The declared order is the wire
//! order: base components first, specialised ones after.

use std::any::Any;

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::Result;

use super::{Category, Serial};

/// An object that survives save cycles
///
/// ## Contract
/// - `serialize` only reads the entity; it advances the writer and nothing
///   else.
/// - `deserialize` leaves the entity untouched when it returns an error.
pub trait Persistent: Send + Sync {
    /// Stable identity (framed by the save file, not part of the record)
    fn serial(&self) -> Serial;

    /// Category the entity is saved and counted under
    fn category(&self) -> Category;

    /// Registered type name used to respawn the entity on load
    fn type_name(&self) -> &'static str;

    /// Append this entity's component records to `writer`
    fn serialize(&self, writer: &mut BinaryWriter);

    /// Replace this entity's state with the records read from `reader`
    fn deserialize(&mut self, reader: &mut BinaryReader) -> Result<()>;

    /// Concrete type access for callers that know what they loaded
    fn as_any(&self) -> &dyn Any;
}

/// Construct a blank entity for a stored serial, ready to be deserialized
pub trait Spawn: Persistent + Sized {
    const TYPE_NAME: &'static str;

    fn spawn(serial: Serial) -> Self;
}

/// Implement [`Persistent`] and [`Spawn`] for a struct built from components
///
/// The struct needs a `serial: Serial` field and a `Default` impl.
///
/// ```ignore
/// persistent! {
///     MaleKimono,
///     type_name = "MaleKimono",
///     category = Item,
///     components = [item: ItemCore, durability: Durability, attributes: Attributes],
/// }
/// ```
#[macro_export]
macro_rules! persistent {
    (
        $ty:ident,
        type_name = $name:literal,
        category = $category:ident,
        components = [ $( $part:ident : $comp:ty ),+ $(,)? ] $(,)?
    ) => {
        impl $crate::record::Persistent for $ty {
            fn serial(&self) -> $crate::record::Serial {
                self.serial
            }

            fn category(&self) -> $crate::record::Category {
                $crate::record::Category::$category
            }

            fn type_name(&self) -> &'static str {
                $name
            }

            fn serialize(&self, writer: &mut $crate::cursor::BinaryWriter) {
                $( $crate::record::write_component::<$comp>(&self.$part, writer); )+
            }

            fn deserialize(
                &mut self,
                reader: &mut $crate::cursor::BinaryReader,
            ) -> $crate::error::Result<()> {
                // Decode every component before touching self
                $( let $part = $crate::record::read_component::<$comp>(reader)?; )+
                $( self.$part = $part; )+
                Ok(())
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::record::Spawn for $ty {
            const TYPE_NAME: &'static str = $name;

            fn spawn(serial: $crate::record::Serial) -> Self {
                Self {
                    serial,
                    ..::core::default::Default::default()
                }
            }
        }
    };
}
