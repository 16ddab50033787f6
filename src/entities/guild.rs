//! Guilds

use crate::persistent;
use crate::record::{Component, Field, Serial};

/// Guild roster
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuildCore {
    pub name: String,
    pub abbreviation: String,
    pub leader: Serial,
    pub members: Vec<Serial>,
}

impl Component for GuildCore {
    const KIND: &'static str = "GuildCore";
    const VERSION: i32 = 0;
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("name", 0, |c, w| w.write_string(&c.name), |c, r| {
            c.name = r.read_string()?;
            Ok(())
        }),
        Field::new(
            "abbreviation",
            0,
            |c, w| w.write_string(&c.abbreviation),
            |c, r| {
                c.abbreviation = r.read_string()?;
                Ok(())
            },
        ),
        Field::new("leader", 0, |c, w| w.write_serial(c.leader), |c, r| {
            c.leader = r.read_serial()?;
            Ok(())
        }),
        Field::new(
            "members",
            0,
            |c, w| {
                w.write_u32(c.members.len() as u32);
                for member in &c.members {
                    w.write_serial(*member);
                }
            },
            |c, r| {
                let count = r.read_u32()? as usize;
                // Cap the preallocation by what the buffer could hold
                let mut members = Vec::with_capacity(count.min(r.remaining() / 4));
                for _ in 0..count {
                    members.push(r.read_serial()?);
                }
                c.members = members;
                Ok(())
            },
        ),
    ];
}

/// A player guild
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guild {
    pub serial: Serial,
    pub roster: GuildCore,
}

impl Guild {
    pub fn new(serial: Serial, name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            serial,
            roster: GuildCore {
                name: name.into(),
                abbreviation: abbreviation.into(),
                ..GuildCore::default()
            },
        }
    }

    /// Add a member; the first member becomes leader
    pub fn add_member(&mut self, member: Serial) {
        if self.roster.members.is_empty() {
            self.roster.leader = member;
        }
        if !self.roster.members.contains(&member) {
            self.roster.members.push(member);
        }
    }
}

persistent! {
    Guild,
    type_name = "Guild",
    category = Guild,
    components = [roster: GuildCore],
}
