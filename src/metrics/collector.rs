//! Save Metrics Collector
//!
//! One collector per save cycle. Every entity save path and the file flush
//! path report into it concurrently.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::config::Config;
use crate::record::Category;

use super::counters::{CounterId, SAVE_COUNTERS};
use super::sink::{global_sink, CounterSink};

/// Save cycles started in this process
static SAVE_CYCLES: AtomicU64 = AtomicU64::new(0);

static UNSUPPORTED_WARNING: OnceCell<()> = OnceCell::new();
static REGISTRATION_WARNING: OnceCell<()> = OnceCell::new();

/// Number of save-cycle collectors constructed by this process
pub fn total_save_cycles() -> u64 {
    SAVE_CYCLES.load(Ordering::Relaxed)
}

/// Lifecycle state of a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// Accepting `on_*` reports
    Active,
    /// Inert; reports are ignored
    Disposed,
}

/// Per-cycle totals observed by one collector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveCycleStats {
    pub cycle: u64,
    pub items: u64,
    pub mobiles: u64,
    pub data: u64,
    pub serialized_bytes: u64,
    pub written_bytes: u64,
}

/// Throughput instrumentation for one save cycle
///
/// ## Concurrency:
/// All `on_*` methods take `&self` and only perform relaxed atomic adds
/// (plus the sink's own increments), so any number of save workers can
/// report at once without contending on a lock.
///
/// ## Degradation:
/// If the sink cannot register counters the collector keeps its local
/// totals but publishes nothing. Callers never branch on this.
pub struct SaveMetrics {
    /// Sink receiving increments; `None` when not publishing
    sink: Option<Arc<dyn CounterSink>>,
    /// Save-cycle number assigned at construction (0 when disabled)
    cycle: u64,
    disposed: AtomicBool,

    items: AtomicU64,
    mobiles: AtomicU64,
    data: AtomicU64,
    serialized_bytes: AtomicU64,
    written_bytes: AtomicU64,
}

impl SaveMetrics {
    /// Start a save cycle reporting into `sink`
    ///
    /// Registers `category` with the sink unless it already exists. An
    /// unsupported platform or a failed registration is logged once and
    /// leaves the collector working without publishing.
    pub fn new(sink: Arc<dyn CounterSink>, category: &str, description: &str) -> Self {
        let publishing = Self::register(sink.as_ref(), category, description);
        let cycle = SAVE_CYCLES.fetch_add(1, Ordering::Relaxed) + 1;

        let sink = if publishing { Some(sink) } else { None };
        if let Some(sink) = &sink {
            sink.increment(CounterId::SaveCount);
        }

        tracing::debug!(cycle, publishing, "Save metrics collector active");

        Self::build(sink, cycle, false)
    }

    /// Start a save cycle as configured; disabled metrics give an inert
    /// collector
    pub fn from_config(config: &Config, sink: Arc<dyn CounterSink>) -> Self {
        if !config.metrics_enabled {
            return Self::disabled();
        }
        Self::new(sink, &config.counter_category, &config.counter_category_description)
    }

    /// Start a save cycle reporting into the process-wide sink
    pub fn with_global_sink(config: &Config) -> Self {
        Self::from_config(config, global_sink())
    }

    /// A collector that ignores every report
    pub fn disabled() -> Self {
        Self::build(None, 0, true)
    }

    fn build(sink: Option<Arc<dyn CounterSink>>, cycle: u64, disposed: bool) -> Self {
        Self {
            sink,
            cycle,
            disposed: AtomicBool::new(disposed),
            items: AtomicU64::new(0),
            mobiles: AtomicU64::new(0),
            data: AtomicU64::new(0),
            serialized_bytes: AtomicU64::new(0),
            written_bytes: AtomicU64::new(0),
        }
    }

    /// Register the counter category; returns whether the sink will publish
    fn register(sink: &dyn CounterSink, category: &str, description: &str) -> bool {
        if !sink.supports_registration() {
            UNSUPPORTED_WARNING.get_or_init(|| {
                tracing::warn!(
                    "Save metrics are enabled but not supported on this platform; counters will not be published"
                );
            });
            return false;
        }

        if sink.category_exists(category) {
            return true;
        }

        match sink.register_category(category, description, &SAVE_COUNTERS) {
            Ok(()) => {
                tracing::info!(category, "Registered save counters");
                true
            }
            Err(e) => {
                REGISTRATION_WARNING.get_or_init(|| {
                    tracing::warn!(
                        category,
                        "Save counter registration failed ({}); counters will not be published",
                        e
                    );
                });
                tracing::debug!(category, error = %e, "Save counter registration failed");
                false
            }
        }
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// An item was serialized into `bytes` bytes
    pub fn on_item_saved(&self, bytes: usize) {
        self.record_entity(&self.items, CounterId::ItemsPerSec, bytes);
    }

    /// A mobile was serialized into `bytes` bytes
    pub fn on_mobile_saved(&self, bytes: usize) {
        self.record_entity(&self.mobiles, CounterId::MobilesPerSec, bytes);
    }

    /// An auxiliary data object was serialized into `bytes` bytes
    pub fn on_data_saved(&self, bytes: usize) {
        self.record_entity(&self.data, CounterId::DataPerSec, bytes);
    }

    /// A guild was serialized into `bytes` bytes
    ///
    /// Guilds only contribute serialized bytes; they have no count of their
    /// own.
    pub fn on_guild_saved(&self, bytes: usize) {
        if self.is_disposed() {
            return;
        }
        self.add_serialized(bytes as u64);
    }

    /// `bytes` bytes reached the flush path
    pub fn on_file_written(&self, bytes: usize) {
        if self.is_disposed() {
            return;
        }
        self.written_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
        if let Some(sink) = &self.sink {
            sink.increment_by(CounterId::WrittenBytesPerSec, bytes as u64);
        }
    }

    /// Route a serialized entity to its category's report
    pub fn on_saved(&self, category: Category, bytes: usize) {
        match category {
            Category::Item => self.on_item_saved(bytes),
            Category::Mobile => self.on_mobile_saved(bytes),
            Category::Guild => self.on_guild_saved(bytes),
            Category::Data => self.on_data_saved(bytes),
        }
    }

    fn record_entity(&self, count: &AtomicU64, id: CounterId, bytes: usize) {
        if self.is_disposed() {
            return;
        }
        count.fetch_add(1, Ordering::Relaxed);
        if let Some(sink) = &self.sink {
            sink.increment(id);
        }
        self.add_serialized(bytes as u64);
    }

    fn add_serialized(&self, bytes: u64) {
        self.serialized_bytes.fetch_add(bytes, Ordering::Relaxed);
        if let Some(sink) = &self.sink {
            sink.increment_by(CounterId::SerializedBytesPerSec, bytes);
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mark the collector inert
    ///
    /// Safe to call any number of times. Counters are left as they are; the
    /// sink owns their lifetime.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            let stats = self.stats();
            tracing::debug!(
                cycle = stats.cycle,
                items = stats.items,
                mobiles = stats.mobiles,
                data = stats.data,
                serialized_bytes = stats.serialized_bytes,
                written_bytes = stats.written_bytes,
                "Save metrics collector disposed"
            );
        }
    }

    pub fn state(&self) -> CollectorState {
        if self.is_disposed() {
            CollectorState::Disposed
        } else {
            CollectorState::Active
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Whether reports reach the sink
    pub fn is_publishing(&self) -> bool {
        self.sink.is_some()
    }

    /// Save-cycle number of this collector
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Totals reported to this collector
    pub fn stats(&self) -> SaveCycleStats {
        SaveCycleStats {
            cycle: self.cycle,
            items: self.items.load(Ordering::Relaxed),
            mobiles: self.mobiles.load(Ordering::Relaxed),
            data: self.data.load(Ordering::Relaxed),
            serialized_bytes: self.serialized_bytes.load(Ordering::Relaxed),
            written_bytes: self.written_bytes.load(Ordering::Relaxed),
        }
    }
}

impl Drop for SaveMetrics {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for SaveMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveMetrics")
            .field("cycle", &self.cycle)
            .field("state", &self.state())
            .field("publishing", &self.is_publishing())
            .field("stats", &self.stats())
            .finish()
    }
}
