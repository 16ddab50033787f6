//! # WorldSave
//!
//! Versioned binary persistence for a game world, with:
//! - A little-endian binary cursor with optional per-value type tags
//! - Version-tagged component records that stay readable across releases
//! - Parallel, buffered save cycles framed into per-category files
//! - Per-cycle save counters published to a pluggable counter sink
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  WorldSaver / WorldLoader                   │
//! │        (category files, framing, checksums, workers)        │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//! ┌──────────────▼───────────────┐   ┌──────────▼──────────────┐
//! │       Persistent Entities    │   │       SaveMetrics       │
//! │  (components, base first)    │   │  (one collector/cycle)  │
//! └──────────────┬───────────────┘   └──────────┬──────────────┘
//!                │                              │
//! ┌──────────────▼───────────────┐   ┌──────────▼──────────────┐
//! │       Component Records      │   │       CounterSink       │
//! │   ([version][fields...])     │   │  (category + counters)  │
//! └──────────────┬───────────────┘   └─────────────────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │  BinaryWriter / BinaryReader │
//! │      (little-endian)         │
//! └──────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod cursor;
pub mod record;
pub mod entities;
pub mod metrics;
pub mod save;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SaveError};
pub use config::Config;
pub use metrics::SaveMetrics;
pub use record::{Category, Persistent, Serial};
pub use save::{TypeRegistry, World, WorldLoader, WorldSaver};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of WorldSave
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
