//! Save Module
//!
//! Drives save and load cycles over a [`World`], framing entity records
//! into one file per category and feeding the save metrics collector.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (8 bytes)                                            │
//! │   Magic: "WSAV" (4) | Format: u16 (2) | Flags (1) | Cat (1) │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Entries (variable)                                          │
//! │   [Serial: i32][TypeLen: u32][TypeName][RecLen: u32][Record]│
//! │   ... repeated for each entity ...                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Footer (12 bytes)                                           │
//! │   EntryCount: u64 (8) | EntriesCRC: u32 (4)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Flag bit 0 marks records written with primitive type tags.
//!
//! ## Failure Scope
//! - Header, footer, checksum or framing problems abort the load.
//! - A record that fails to decode is skipped and reported; the rest of
//!   the world still loads.

mod format;
mod loader;
mod world;
mod writer;

pub use format::{FileHeader, FOOTER_SIZE, FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use loader::{LoadReport, RecordDiagnostic, WorldLoader};
pub use world::{TypeRegistry, World};
pub use writer::{SaveSummary, SavedFile, WorldSaver};
