//! WorldSave CLI
//!
//! Runs an instrumented save of a sample world, or inspects an existing save.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use worldsave::entities::{BlackthornKimono, DataObject, Guild, MaleKimono, Mobile};
use worldsave::metrics::{install_sink, InMemorySink};
use worldsave::save::SaveSummary;
use worldsave::{Category, Config, Serial, TypeRegistry, World, WorldLoader, WorldSaver};

/// WorldSave
#[derive(Parser, Debug)]
#[command(name = "worldsave")]
#[command(about = "Versioned world persistence with save-cycle metrics")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save a generated sample world and report the cycle's counters
    Demo {
        /// Save directory
        #[arg(short, long, default_value = "./world_save")]
        dir: PathBuf,

        /// Number of items to generate
        #[arg(short, long, default_value = "1000")]
        items: u32,

        /// Number of mobiles to generate
        #[arg(short, long, default_value = "200")]
        mobiles: u32,

        /// Flush threshold in KB
        #[arg(long, default_value = "64")]
        flush_kb: usize,

        /// Write one-byte type tags before every value
        #[arg(long)]
        type_tags: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a save and report what was read
    Inspect {
        /// Save directory
        #[arg(short, long, default_value = "./world_save")]
        dir: PathBuf,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,worldsave=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    tracing::info!("WorldSave v{}", worldsave::VERSION);

    let result = match args.command {
        Commands::Demo {
            dir,
            items,
            mobiles,
            flush_kb,
            type_tags,
            json,
        } => {
            let config = Config::builder()
                .save_dir(dir)
                .flush_threshold(flush_kb * 1024)
                .type_tags(type_tags)
                .build();
            demo(config, items, mobiles, json)
        }
        Commands::Inspect { dir } => inspect(dir),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn demo(config: Config, items: u32, mobiles: u32, json: bool) -> worldsave::Result<()> {
    let sink = Arc::new(InMemorySink::new());
    if !install_sink(sink.clone()) {
        tracing::warn!("Process counter sink already installed");
    }

    let world = sample_world(items, mobiles);
    let saver = WorldSaver::new(config)?;
    let summary = saver.save(&world)?;
    let sample = sink.sample();

    if json {
        let report = serde_json::json!({
            "elapsed_ms": summary.elapsed.as_millis() as u64,
            "files": summary.files.iter().map(|f| serde_json::json!({
                "category": f.category.to_string(),
                "path": f.path.display().to_string(),
                "entries": f.entries,
                "bytes": f.bytes,
            })).collect::<Vec<_>>(),
            "stats": summary.stats,
            "totals": sink.snapshot(),
            "sample": sample,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::error!("Failed to encode report: {}", e),
        }
    } else {
        print_summary(&summary);
        println!(
            "rates over {} ms: {:.0} items/s, {:.0} mobiles/s, {:.0} serialized B/s, {:.0} written B/s",
            sample.elapsed_ms,
            sample.items_per_sec,
            sample.mobiles_per_sec,
            sample.serialized_bytes_per_sec,
            sample.written_bytes_per_sec
        );
    }
    Ok(())
}

fn inspect(dir: PathBuf) -> worldsave::Result<()> {
    let loader = WorldLoader::open(&dir, TypeRegistry::with_builtin_entities());
    let (world, report) = loader.load()?;

    println!("{} ({} files)", dir.display(), report.files_read);
    for category in Category::ALL {
        println!("  {:<8} {}", category.to_string(), world.count(category));
    }
    if report.is_clean() {
        println!("all records loaded");
    } else {
        println!("{} records skipped:", report.entities_skipped());
        for diagnostic in &report.diagnostics {
            println!("  {}", diagnostic);
        }
    }
    Ok(())
}

fn print_summary(summary: &SaveSummary) {
    println!("save cycle {} in {:?}", summary.stats.cycle, summary.elapsed);
    for file in &summary.files {
        println!(
            "  {:<12} {:>8} entries {:>10} bytes",
            file.category.file_name(),
            file.entries,
            file.bytes
        );
    }
    println!(
        "  serialized {} bytes, wrote {} bytes",
        summary.stats.serialized_bytes, summary.stats.written_bytes
    );
}

/// Build a world with a spread of every built-in entity type
fn sample_world(items: u32, mobiles: u32) -> World {
    let mut world = World::new();
    let mut next = 1i32;
    let mut serial = || {
        let s = Serial::new(next);
        next += 1;
        s
    };

    for i in 0..items {
        if i % 10 == 0 {
            world.add(BlackthornKimono::new(serial()));
        } else {
            world.add(MaleKimono::new(serial()));
        }
    }

    let mut guild = Guild::new(serial(), "Fellowship", "FS");
    for i in 0..mobiles {
        let mobile = Mobile::new(serial(), format!("Citizen {}", i));
        if i % 4 == 0 {
            guild.add_member(mobile.serial);
        }
        world.add(mobile);
    }
    world.add(guild);
    world.add(DataObject::new(serial(), "moongates", vec![0u8; 256]));

    world
}
