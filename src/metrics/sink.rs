//! Counter sinks
//!
//! The sink is the external monitoring facility. It owns counter storage
//! and lifetime; collectors only push increments into it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::error::{Result, SaveError};

use super::counters::{CounterId, CounterSpec, COUNTER_COUNT};

/// Facility that registers and receives save counters
///
/// Implementations must make `increment`/`increment_by` cheap and
/// non-blocking; they run on every entity save.
pub trait CounterSink: Send + Sync {
    /// Whether counter categories can be registered on this platform
    fn supports_registration(&self) -> bool {
        true
    }

    fn category_exists(&self, name: &str) -> bool;

    fn register_category(&self, name: &str, description: &str, counters: &[CounterSpec]) -> Result<()>;

    fn increment(&self, id: CounterId) {
        self.increment_by(id, 1);
    }

    fn increment_by(&self, id: CounterId, amount: u64);
}

// =============================================================================
// NoopSink
// =============================================================================

/// Sink that accepts everything and records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl CounterSink for NoopSink {
    fn category_exists(&self, _name: &str) -> bool {
        // Nothing to register
        true
    }

    fn register_category(&self, _name: &str, _description: &str, _counters: &[CounterSpec]) -> Result<()> {
        Ok(())
    }

    fn increment_by(&self, _id: CounterId, _amount: u64) {}
}

// =============================================================================
// InMemorySink
// =============================================================================

/// Registered counter category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredCategory {
    pub description: String,
    pub counters: Vec<&'static str>,
}

/// Running totals of every counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub save_count: u64,
    pub items: u64,
    pub mobiles: u64,
    pub data: u64,
    pub serialized_bytes: u64,
    pub written_bytes: u64,
}

/// Rates over one sampling interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CounterSample {
    pub elapsed_ms: u64,
    pub save_count: u64,
    pub items_per_sec: f64,
    pub mobiles_per_sec: f64,
    pub data_per_sec: f64,
    pub serialized_bytes_per_sec: f64,
    pub written_bytes_per_sec: f64,
    /// Raw increments seen during the interval
    pub window: CounterSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkMode {
    Supported,
    Unsupported,
    Failing,
}

/// Process-local counter store readable by a monitoring loop
///
/// ## Concurrency:
/// - Counters: atomics (lock-free increments from any thread)
/// - `categories`, `window_start`: locks, touched only on registration and
///   sampling
pub struct InMemorySink {
    /// Totals since creation
    totals: [AtomicU64; COUNTER_COUNT],
    /// Increments since the last `sample()`
    window: [AtomicU64; COUNTER_COUNT],
    /// Start of the current sampling window
    window_start: Mutex<Instant>,
    /// Registered categories by name
    categories: RwLock<HashMap<String, RegisteredCategory>>,
    /// Successful registrations (for testing/debugging)
    registrations: AtomicU64,
    mode: SinkMode,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::with_mode(SinkMode::Supported)
    }

    /// A sink on a platform without counter support
    pub fn unsupported() -> Self {
        Self::with_mode(SinkMode::Unsupported)
    }

    /// A sink whose registration facility rejects every category
    pub fn failing() -> Self {
        Self::with_mode(SinkMode::Failing)
    }

    fn with_mode(mode: SinkMode) -> Self {
        Self {
            totals: Default::default(),
            window: Default::default(),
            window_start: Mutex::new(Instant::now()),
            categories: RwLock::new(HashMap::new()),
            registrations: AtomicU64::new(0),
            mode,
        }
    }

    /// Current value of one counter
    pub fn value(&self, id: CounterId) -> u64 {
        self.totals[id.index()].load(Ordering::Relaxed)
    }

    /// Totals of every counter
    pub fn snapshot(&self) -> CounterSnapshot {
        Self::read(&self.totals, |slot| slot.load(Ordering::Relaxed))
    }

    /// Close the current sampling window and return its rates
    pub fn sample(&self) -> CounterSample {
        self.sample_at(Instant::now())
    }

    /// Close the sampling window at `now` and return its rates
    pub fn sample_at(&self, now: Instant) -> CounterSample {
        let elapsed = {
            let mut start = self.window_start.lock();
            let elapsed = now.saturating_duration_since(*start);
            *start = now;
            elapsed
        };

        let window = Self::read(&self.window, |slot| slot.swap(0, Ordering::Relaxed));
        let rate = |count: u64| per_second(count, elapsed);

        CounterSample {
            elapsed_ms: elapsed.as_millis() as u64,
            save_count: self.value(CounterId::SaveCount),
            items_per_sec: rate(window.items),
            mobiles_per_sec: rate(window.mobiles),
            data_per_sec: rate(window.data),
            serialized_bytes_per_sec: rate(window.serialized_bytes),
            written_bytes_per_sec: rate(window.written_bytes),
            window,
        }
    }

    /// Registered category by name
    pub fn category(&self, name: &str) -> Option<RegisteredCategory> {
        self.categories.read().get(name).cloned()
    }

    /// Number of successful category registrations
    pub fn registrations(&self) -> u64 {
        self.registrations.load(Ordering::Relaxed)
    }

    fn read(slots: &[AtomicU64; COUNTER_COUNT], load: impl Fn(&AtomicU64) -> u64) -> CounterSnapshot {
        let get = |id: CounterId| load(&slots[id.index()]);
        CounterSnapshot {
            save_count: get(CounterId::SaveCount),
            items: get(CounterId::ItemsPerSec),
            mobiles: get(CounterId::MobilesPerSec),
            data: get(CounterId::DataPerSec),
            serialized_bytes: get(CounterId::SerializedBytesPerSec),
            written_bytes: get(CounterId::WrittenBytesPerSec),
        }
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSink for InMemorySink {
    fn supports_registration(&self) -> bool {
        self.mode != SinkMode::Unsupported
    }

    fn category_exists(&self, name: &str) -> bool {
        self.categories.read().contains_key(name)
    }

    fn register_category(&self, name: &str, description: &str, counters: &[CounterSpec]) -> Result<()> {
        match self.mode {
            SinkMode::Supported => {}
            SinkMode::Unsupported => {
                return Err(SaveError::CounterRegistration(
                    "counter categories are not supported on this platform".to_string(),
                ))
            }
            SinkMode::Failing => {
                return Err(SaveError::CounterRegistration(format!(
                    "access denied creating category '{}'",
                    name
                )))
            }
        }

        let mut categories = self.categories.write();
        if !categories.contains_key(name) {
            categories.insert(
                name.to_string(),
                RegisteredCategory {
                    description: description.to_string(),
                    counters: counters.iter().map(|c| c.name).collect(),
                },
            );
            self.registrations.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn increment_by(&self, id: CounterId, amount: u64) {
        self.totals[id.index()].fetch_add(amount, Ordering::Relaxed);
        self.window[id.index()].fetch_add(amount, Ordering::Relaxed);
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

// =============================================================================
// Process-wide sink
// =============================================================================

static PROCESS_SINK: OnceCell<Arc<dyn CounterSink>> = OnceCell::new();

static NOOP_SINK: Lazy<Arc<dyn CounterSink>> = Lazy::new(|| Arc::new(NoopSink));

/// Install the process-wide sink
///
/// Succeeds once per process; later calls return `false` and leave the
/// installed sink in place.
pub fn install_sink(sink: Arc<dyn CounterSink>) -> bool {
    let installed = PROCESS_SINK.set(sink).is_ok();
    if !installed {
        tracing::debug!("process counter sink already installed");
    }
    installed
}

/// The installed process-wide sink, or the shared no-op sink
pub fn global_sink() -> Arc<dyn CounterSink> {
    PROCESS_SINK
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::clone(&NOOP_SINK))
}
