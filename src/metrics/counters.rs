//! Save counter definitions

/// Number of counters in the save category
pub const COUNTER_COUNT: usize = 6;

/// Identifies one save counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterId {
    SaveCount,
    ItemsPerSec,
    MobilesPerSec,
    DataPerSec,
    SerializedBytesPerSec,
    WrittenBytesPerSec,
}

impl CounterId {
    pub const ALL: [CounterId; COUNTER_COUNT] = [
        CounterId::SaveCount,
        CounterId::ItemsPerSec,
        CounterId::MobilesPerSec,
        CounterId::DataPerSec,
        CounterId::SerializedBytesPerSec,
        CounterId::WrittenBytesPerSec,
    ];

    /// Slot of this counter in [`SAVE_COUNTERS`] and in sink storage
    pub fn index(self) -> usize {
        match self {
            CounterId::SaveCount => 0,
            CounterId::ItemsPerSec => 1,
            CounterId::MobilesPerSec => 2,
            CounterId::DataPerSec => 3,
            CounterId::SerializedBytesPerSec => 4,
            CounterId::WrittenBytesPerSec => 5,
        }
    }

    pub fn spec(self) -> &'static CounterSpec {
        &SAVE_COUNTERS[self.index()]
    }
}

/// How the sink interprets a counter's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// Absolute value
    NumberOfItems,
    /// Increments per second over the sampling interval
    RateOfCountsPerSecond,
}

/// Registration data for one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSpec {
    pub id: CounterId,
    pub name: &'static str,
    pub help: &'static str,
    pub kind: CounterKind,
}

/// The save counter category, in registration order
pub const SAVE_COUNTERS: [CounterSpec; COUNTER_COUNT] = [
    CounterSpec {
        id: CounterId::SaveCount,
        name: "Save - Count",
        help: "Number of world saves.",
        kind: CounterKind::NumberOfItems,
    },
    CounterSpec {
        id: CounterId::ItemsPerSec,
        name: "Save - Items/sec",
        help: "Number of items saved per second.",
        kind: CounterKind::RateOfCountsPerSecond,
    },
    CounterSpec {
        id: CounterId::MobilesPerSec,
        name: "Save - Mobiles/sec",
        help: "Number of mobiles saved per second.",
        kind: CounterKind::RateOfCountsPerSecond,
    },
    CounterSpec {
        id: CounterId::DataPerSec,
        name: "Save - Data/sec",
        help: "Number of auxiliary data objects saved per second.",
        kind: CounterKind::RateOfCountsPerSecond,
    },
    CounterSpec {
        id: CounterId::SerializedBytesPerSec,
        name: "Save - Serialized bytes/sec",
        help: "Amount of world-save bytes serialized per second.",
        kind: CounterKind::RateOfCountsPerSecond,
    },
    CounterSpec {
        id: CounterId::WrittenBytesPerSec,
        name: "Save - Written bytes/sec",
        help: "Amount of world-save bytes written to disk per second.",
        kind: CounterKind::RateOfCountsPerSecond,
    },
];
