//! Auxiliary save data (named opaque blobs owned by subsystems)

use bytes::Bytes;

use crate::persistent;
use crate::record::{Component, Field, Serial};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataCore {
    pub name: String,
    pub payload: Bytes,
}

impl Component for DataCore {
    const KIND: &'static str = "DataCore";
    const VERSION: i32 = 0;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("name", 0, |c, w| w.write_string(&c.name), |c, r| {
            c.name = r.read_string()?;
            Ok(())
        }),
        Field::new("payload", 0, |c, w| w.write_bytes(&c.payload), |c, r| {
            c.payload = r.read_bytes()?;
            Ok(())
        }),
    ];
}

/// A named blob saved alongside the world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataObject {
    pub serial: Serial,
    pub data: DataCore,
}

impl DataObject {
    pub fn new(serial: Serial, name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            serial,
            data: DataCore {
                name: name.into(),
                payload: payload.into(),
            },
        }
    }
}

persistent! {
    DataObject,
    type_name = "DataObject",
    category = Data,
    components = [data: DataCore],
}
