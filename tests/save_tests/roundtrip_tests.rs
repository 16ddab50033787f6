//! Tests for save/load cycles
//!
//! These tests verify:
//! - A saved world loads back entity for entity
//! - Tagged saves record the mode in the header and load back
//! - Every physical write is counted as written bytes
//! - Empty worlds and missing files

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;
use worldsave::entities::{BlackthornKimono, DataObject, Guild, MaleKimono, Mobile};
use worldsave::metrics::{InMemorySink, NoopSink};
use worldsave::save::{FileHeader, FOOTER_SIZE, HEADER_SIZE, MAGIC};
use worldsave::{Category, Config, Serial, TypeRegistry, World, WorldLoader, WorldSaver};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_world() -> World {
    let mut world = World::new();
    for i in 0..40 {
        if i % 5 == 0 {
            world.add(BlackthornKimono::new(Serial::new(0x4000_0000 + i)));
        } else {
            world.add(MaleKimono::new(Serial::new(0x4000_0000 + i)));
        }
    }

    let mut guild = Guild::new(Serial::new(2), "Britannian Militia", "BM");
    for i in 0..10 {
        let mobile = Mobile::new(Serial::new(100 + i), format!("Guard {}", i));
        guild.add_member(mobile.serial);
        world.add(mobile);
    }
    world.add(guild);
    world.add(DataObject::new(Serial::new(3), "regions", vec![7u8; 100]));
    world
}

fn config(temp: &TempDir) -> Config {
    Config::builder()
        .save_dir(temp.path())
        .flush_threshold(256)
        .worker_threads(4)
        .build()
}

fn load(config: &Config) -> World {
    let (world, report) = WorldLoader::new(config, TypeRegistry::with_builtin_entities())
        .load()
        .unwrap();
    assert!(report.is_clean(), "unexpected diagnostics: {:?}", report.diagnostics);
    world
}

fn assert_same_world(saved: &World, loaded: &World) {
    assert_eq!(loaded.len(), saved.len());
    for category in Category::ALL {
        let a = saved.category(category);
        let b = loaded.category(category);
        assert_eq!(a.len(), b.len(), "{} count differs", category);
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.serial(), y.serial());
            assert_eq!(x.type_name(), y.type_name());
        }
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_world_roundtrip() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let world = sample_world();

    let summary = WorldSaver::with_sink(config.clone(), Arc::new(NoopSink))
        .unwrap()
        .save(&world)
        .unwrap();
    assert_eq!(summary.entries(), world.len() as u64);
    assert_eq!(summary.files.len(), 4);

    let loaded = load(&config);
    assert_same_world(&world, &loaded);

    let artifact = loaded
        .find_as::<BlackthornKimono>(Category::Item, Serial::new(0x4000_0005))
        .unwrap();
    assert_eq!(artifact, &BlackthornKimono::new(Serial::new(0x4000_0005)));

    let guild = loaded.find_as::<Guild>(Category::Guild, Serial::new(2)).unwrap();
    assert_eq!(guild.roster.members.len(), 10);
    assert_eq!(guild.roster.leader, Serial::new(100));

    let data = loaded.find_as::<DataObject>(Category::Data, Serial::new(3)).unwrap();
    assert_eq!(data.data.payload.len(), 100);
}

#[test]
fn test_tagged_world_roundtrip() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .save_dir(temp.path())
        .type_tags(true)
        .build();
    let world = sample_world();

    WorldSaver::with_sink(config.clone(), Arc::new(NoopSink))
        .unwrap()
        .save(&world)
        .unwrap();

    let raw = fs::read(temp.path().join(Category::Mobile.file_name())).unwrap();
    assert_eq!(&raw[0..4], MAGIC);
    let header = FileHeader::decode(&raw[..HEADER_SIZE]).unwrap();
    assert!(header.type_tags);
    assert_eq!(header.category, Category::Mobile);

    let loaded = load(&config);
    assert_same_world(&world, &loaded);
    let mobile = loaded.find_as::<Mobile>(Category::Mobile, Serial::new(104)).unwrap();
    assert_eq!(mobile.core.name, "Guard 4");
}

#[test]
fn test_tags_make_records_larger() {
    let plain = TempDir::new().unwrap();
    let tagged = TempDir::new().unwrap();
    let world = sample_world();

    let plain_summary = WorldSaver::with_sink(config(&plain), Arc::new(NoopSink))
        .unwrap()
        .save(&world)
        .unwrap();
    let tagged_config = Config::builder().save_dir(tagged.path()).type_tags(true).build();
    let tagged_summary = WorldSaver::with_sink(tagged_config, Arc::new(NoopSink))
        .unwrap()
        .save(&world)
        .unwrap();

    assert!(tagged_summary.stats.serialized_bytes > plain_summary.stats.serialized_bytes);
}

// =============================================================================
// Metrics Tests
// =============================================================================

#[test]
fn test_save_reports_counters() {
    let temp = TempDir::new().unwrap();
    let sink = Arc::new(InMemorySink::new());
    let world = sample_world();

    let saver = WorldSaver::with_sink(config(&temp), sink.clone()).unwrap();
    let summary = saver.save(&world).unwrap();

    let totals = sink.snapshot();
    assert_eq!(totals.save_count, 1);
    assert_eq!(totals.items, 40);
    assert_eq!(totals.mobiles, 10);
    assert_eq!(totals.data, 1);
    assert_eq!(totals.serialized_bytes, summary.stats.serialized_bytes);
    assert_eq!(totals.written_bytes, summary.bytes_written());

    // Written bytes cover framing as well as records
    let on_disk: u64 = summary
        .files
        .iter()
        .map(|f| fs::metadata(&f.path).unwrap().len())
        .sum();
    assert_eq!(summary.bytes_written(), on_disk);
    assert!(totals.written_bytes > totals.serialized_bytes);

    saver.save(&world).unwrap();
    assert_eq!(sink.snapshot().save_count, 2);
    assert_eq!(sink.snapshot().items, 80);
    assert_eq!(sink.registrations(), 1);
}

#[test]
fn test_save_with_metrics_disabled() {
    let temp = TempDir::new().unwrap();
    let sink = Arc::new(InMemorySink::new());
    let config = Config::builder()
        .save_dir(temp.path())
        .metrics_enabled(false)
        .build();

    let summary = WorldSaver::with_sink(config, sink.clone())
        .unwrap()
        .save(&sample_world())
        .unwrap();

    assert_eq!(summary.stats.cycle, 0);
    assert_eq!(sink.snapshot().save_count, 0);
    assert_eq!(sink.registrations(), 0);
}

// =============================================================================
// Edge Case Tests
// =============================================================================

#[test]
fn test_empty_world() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);

    let summary = WorldSaver::with_sink(config.clone(), Arc::new(NoopSink))
        .unwrap()
        .save(&World::new())
        .unwrap();
    for file in &summary.files {
        assert_eq!(file.entries, 0);
        assert_eq!(file.bytes, (HEADER_SIZE + FOOTER_SIZE) as u64);
    }

    assert!(load(&config).is_empty());
}

#[test]
fn test_missing_category_file_loads_empty() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let world = sample_world();

    WorldSaver::with_sink(config.clone(), Arc::new(NoopSink))
        .unwrap()
        .save(&world)
        .unwrap();
    fs::remove_file(temp.path().join(Category::Guild.file_name())).unwrap();

    let (loaded, report) = WorldLoader::new(&config, TypeRegistry::with_builtin_entities())
        .load()
        .unwrap();
    assert_eq!(report.files_read, 3);
    assert_eq!(loaded.count(Category::Guild), 0);
    assert_eq!(loaded.count(Category::Item), 40);
}

#[test]
fn test_resave_replaces_files() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let saver = WorldSaver::with_sink(config.clone(), Arc::new(NoopSink)).unwrap();

    saver.save(&sample_world()).unwrap();
    let mut smaller = World::new();
    smaller.add(Mobile::new(Serial::new(1), "Lord British"));
    saver.save(&smaller).unwrap();

    let loaded = load(&config);
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded.find_as::<Mobile>(Category::Mobile, Serial::new(1)).unwrap().core.name,
        "Lord British"
    );
}
