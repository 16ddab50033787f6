//! Save Metrics Module
//!
//! Measures save-cycle throughput and publishes it to an external counter
//! sink.
//!
//! ## Responsibilities
//! - Register the save counter category with the sink (once per sink)
//! - Count entities saved per category and bytes serialized/written
//! - Stay lock-free on the save hot path
//! - Degrade to a non-publishing collector when the sink cannot register
//!
//! ## Counters
//! ```text
//! ┌──────────────────────────────┬──────────┐
//! │ Save - Count                 │ absolute │
//! │ Save - Items/sec             │ rate     │
//! │ Save - Mobiles/sec           │ rate     │
//! │ Save - Data/sec              │ rate     │
//! │ Save - Serialized bytes/sec  │ rate     │
//! │ Save - Written bytes/sec     │ rate     │
//! └──────────────────────────────┴──────────┘
//! ```
//!
//! ## Collector Lifecycle
//! ```text
//! Constructed ──► Active ──dispose()──► Disposed (inert, terminal)
//! ```

mod collector;
mod counters;
mod sink;

pub use collector::{total_save_cycles, CollectorState, SaveCycleStats, SaveMetrics};
pub use counters::{CounterId, CounterKind, CounterSpec, COUNTER_COUNT, SAVE_COUNTERS};
pub use sink::{
    global_sink, install_sink, CounterSample, CounterSink, CounterSnapshot, InMemorySink,
    NoopSink, RegisteredCategory,
};
