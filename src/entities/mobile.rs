//! Mobiles (players and creatures)

use chrono::{DateTime, Duration, Utc};

use crate::persistent;
use crate::record::{Component, Field, Serial};

/// Persistent state of a mobile
///
/// ## Versions
/// - v0: name, body, stats, hits
/// - v1: creation time and accumulated play time
#[derive(Debug, Clone, PartialEq)]
pub struct MobileCore {
    pub name: String,
    pub body: i32,
    pub str: i32,
    pub dex: i32,
    pub int: i32,
    pub hits: i32,
    pub created: DateTime<Utc>,
    pub play_time: Duration,
}

impl Default for MobileCore {
    fn default() -> Self {
        Self {
            name: String::new(),
            body: 0,
            str: 0,
            dex: 0,
            int: 0,
            hits: 0,
            created: DateTime::<Utc>::UNIX_EPOCH,
            play_time: Duration::zero(),
        }
    }
}

impl Component for MobileCore {
    const KIND: &'static str = "MobileCore";
    const VERSION: i32 = 1;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("name", 0, |c, w| w.write_string(&c.name), |c, r| {
            c.name = r.read_string()?;
            Ok(())
        }),
        Field::new("body", 0, |c, w| w.write_i32(c.body), |c, r| {
            c.body = r.read_i32()?;
            Ok(())
        }),
        Field::new(
            "stats",
            0,
            |c, w| {
                w.write_i32(c.str);
                w.write_i32(c.dex);
                w.write_i32(c.int);
            },
            |c, r| {
                c.str = r.read_i32()?;
                c.dex = r.read_i32()?;
                c.int = r.read_i32()?;
                Ok(())
            },
        ),
        Field::new("hits", 0, |c, w| w.write_i32(c.hits), |c, r| {
            c.hits = r.read_i32()?;
            Ok(())
        }),
        Field::new("created", 1, |c, w| w.write_datetime(c.created), |c, r| {
            c.created = r.read_datetime()?;
            Ok(())
        }),
        Field::new("play_time", 1, |c, w| w.write_duration(c.play_time), |c, r| {
            c.play_time = r.read_duration()?;
            Ok(())
        }),
    ];
}

/// A player or creature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mobile {
    pub serial: Serial,
    pub core: MobileCore,
}

impl Mobile {
    pub fn new(serial: Serial, name: impl Into<String>) -> Self {
        Self {
            serial,
            core: MobileCore {
                name: name.into(),
                body: 0x190,
                str: 50,
                dex: 50,
                int: 50,
                hits: 50,
                ..MobileCore::default()
            },
        }
    }
}

persistent! {
    Mobile,
    type_name = "Mobile",
    category = Mobile,
    components = [core: MobileCore],
}
