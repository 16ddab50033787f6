//! Tests for the save metrics collector
//!
//! These tests verify:
//! - Each report updates exactly the counters it owns
//! - Guild saves only add serialized bytes
//! - Dispose is idempotent and silences later reports
//! - Unsupported or failing sinks degrade to local-only collection

use std::sync::Arc;

use worldsave::metrics::{
    total_save_cycles, CollectorState, CounterId, CounterSink, InMemorySink, SaveMetrics,
};
use worldsave::{Category, Config};

// =============================================================================
// Helper Functions
// =============================================================================

fn collector(sink: &Arc<InMemorySink>) -> SaveMetrics {
    SaveMetrics::new(sink.clone(), "WorldSave", "World save throughput")
}

// =============================================================================
// Reporting Tests
// =============================================================================

#[test]
fn test_construction_counts_a_save() {
    let sink = Arc::new(InMemorySink::new());
    let metrics = collector(&sink);

    assert_eq!(metrics.state(), CollectorState::Active);
    assert!(metrics.is_publishing());
    assert!(metrics.cycle() >= 1);
    assert_eq!(sink.value(CounterId::SaveCount), 1);

    let category = sink.category("WorldSave").unwrap();
    assert_eq!(category.description, "World save throughput");
    assert_eq!(category.counters.len(), 6);
    assert_eq!(category.counters[0], "Save - Count");
}

#[test]
fn test_entity_reports() {
    let sink = Arc::new(InMemorySink::new());
    let metrics = collector(&sink);

    metrics.on_item_saved(100);
    metrics.on_item_saved(50);
    metrics.on_mobile_saved(70);
    metrics.on_data_saved(5);

    let stats = metrics.stats();
    assert_eq!(stats.items, 2);
    assert_eq!(stats.mobiles, 1);
    assert_eq!(stats.data, 1);
    assert_eq!(stats.serialized_bytes, 225);
    assert_eq!(stats.written_bytes, 0);

    let totals = sink.snapshot();
    assert_eq!(totals.items, 2);
    assert_eq!(totals.mobiles, 1);
    assert_eq!(totals.data, 1);
    assert_eq!(totals.serialized_bytes, 225);
}

#[test]
fn test_guild_only_adds_bytes() {
    let sink = Arc::new(InMemorySink::new());
    let metrics = collector(&sink);

    metrics.on_guild_saved(300);

    let totals = sink.snapshot();
    assert_eq!(totals.serialized_bytes, 300);
    assert_eq!(totals.items, 0);
    assert_eq!(totals.mobiles, 0);
    assert_eq!(totals.data, 0);
}

#[test]
fn test_file_written_only_adds_written_bytes() {
    let sink = Arc::new(InMemorySink::new());
    let metrics = collector(&sink);

    metrics.on_file_written(4096);
    metrics.on_file_written(0);

    assert_eq!(sink.value(CounterId::WrittenBytesPerSec), 4096);
    assert_eq!(sink.value(CounterId::SerializedBytesPerSec), 0);
    assert_eq!(metrics.stats().written_bytes, 4096);
}

#[test]
fn test_on_saved_routes_by_category() {
    let sink = Arc::new(InMemorySink::new());
    let metrics = collector(&sink);

    metrics.on_saved(Category::Item, 1);
    metrics.on_saved(Category::Mobile, 2);
    metrics.on_saved(Category::Guild, 4);
    metrics.on_saved(Category::Data, 8);

    let stats = metrics.stats();
    assert_eq!((stats.items, stats.mobiles, stats.data), (1, 1, 1));
    assert_eq!(stats.serialized_bytes, 15);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_dispose_is_idempotent() {
    let sink = Arc::new(InMemorySink::new());
    let metrics = collector(&sink);
    metrics.on_item_saved(10);

    metrics.dispose();
    assert_eq!(metrics.state(), CollectorState::Disposed);
    metrics.dispose();
    metrics.dispose();
    assert!(metrics.is_disposed());

    metrics.on_item_saved(10);
    metrics.on_guild_saved(10);
    metrics.on_file_written(10);

    assert_eq!(metrics.stats().items, 1);
    assert_eq!(metrics.stats().serialized_bytes, 10);
    assert_eq!(sink.snapshot().items, 1);
    assert_eq!(sink.snapshot().written_bytes, 0);
}

#[test]
fn test_drop_keeps_sink_counters() {
    let sink = Arc::new(InMemorySink::new());
    {
        let metrics = collector(&sink);
        metrics.on_mobile_saved(12);
    }
    assert_eq!(sink.snapshot().mobiles, 1);
    assert_eq!(sink.snapshot().save_count, 1);
}

#[test]
fn test_cycles_are_numbered() {
    let sink = Arc::new(InMemorySink::new());
    let first = collector(&sink);
    let second = collector(&sink);

    assert!(second.cycle() > first.cycle());
    assert!(total_save_cycles() >= second.cycle());
    assert_eq!(sink.value(CounterId::SaveCount), 2);
    // Category registered once, reused by the second cycle
    assert_eq!(sink.registrations(), 1);
}

// =============================================================================
// Degradation Tests
// =============================================================================

#[test]
fn test_unsupported_sink_degrades() {
    let sink = Arc::new(InMemorySink::unsupported());
    let metrics = collector(&sink);

    assert!(!metrics.is_publishing());
    assert_eq!(metrics.state(), CollectorState::Active);

    metrics.on_item_saved(10);
    assert_eq!(metrics.stats().items, 1);
    assert_eq!(sink.snapshot().items, 0);
    assert_eq!(sink.value(CounterId::SaveCount), 0);
    assert!(!sink.supports_registration());
}

#[test]
fn test_failing_registration_degrades() {
    let sink = Arc::new(InMemorySink::failing());
    let metrics = collector(&sink);

    assert!(!metrics.is_publishing());
    metrics.on_mobile_saved(3);
    metrics.dispose();

    assert_eq!(sink.registrations(), 0);
    assert!(sink.category("WorldSave").is_none());
    assert_eq!(sink.snapshot().mobiles, 0);
}

#[test]
fn test_disabled_by_config() {
    let sink = Arc::new(InMemorySink::new());
    let config = Config::builder().metrics_enabled(false).build();
    let metrics = SaveMetrics::from_config(&config, sink.clone());

    assert_eq!(metrics.cycle(), 0);
    assert!(metrics.is_disposed());
    metrics.on_item_saved(1);
    assert_eq!(metrics.stats().items, 0);
    assert_eq!(sink.registrations(), 0);
}

#[test]
fn test_config_names_the_category() {
    let sink = Arc::new(InMemorySink::new());
    let config = Config::builder()
        .counter_category("Shard One")
        .counter_category_description("Shard one saves")
        .build();
    let _metrics = SaveMetrics::from_config(&config, sink.clone());

    assert_eq!(sink.category("Shard One").unwrap().description, "Shard one saves");
}
