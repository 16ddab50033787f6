//! World Saver
//!
//! Runs one instrumented save cycle: parallel serialization, framed
//! buffered writes, metrics reporting.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::config::Config;
use crate::cursor::BinaryWriter;
use crate::error::{Result, SaveError};
use crate::metrics::{global_sink, CounterSink, SaveCycleStats, SaveMetrics};
use crate::record::{Category, Persistent, Serial};

use super::format::{encode_entry, encode_footer, FileHeader};
use super::World;

/// One entity serialized by a worker
struct SerializedRecord {
    serial: Serial,
    type_name: &'static str,
    bytes: Bytes,
}

/// A category file produced by a save cycle
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub category: Category,
    pub path: PathBuf,
    pub entries: u64,
    pub bytes: u64,
}

/// Outcome of one save cycle
#[derive(Debug, Clone)]
pub struct SaveSummary {
    pub files: Vec<SavedFile>,
    pub stats: SaveCycleStats,
    pub elapsed: Duration,
}

impl SaveSummary {
    /// Entities written across all files
    pub fn entries(&self) -> u64 {
        self.files.iter().map(|f| f.entries).sum()
    }

    /// Bytes written across all files
    pub fn bytes_written(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

/// Saves a [`World`] into the configured directory
///
/// ## Save Cycle
/// 1. Open a `SaveMetrics` collector for the cycle
/// 2. Per category, serialize entities on `worker_threads` scoped threads,
///    each entity into its own writer
/// 3. Frame records in world order and write them in chunks of at least
///    `flush_threshold` bytes, reporting each physical write
/// 4. Dispose the collector
pub struct WorldSaver {
    config: Config,
    sink: Arc<dyn CounterSink>,
}

impl WorldSaver {
    /// Saver reporting into the process-wide counter sink
    pub fn new(config: Config) -> Result<Self> {
        Self::with_sink(config, global_sink())
    }

    /// Saver reporting into `sink`
    pub fn with_sink(config: Config, sink: Arc<dyn CounterSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sink })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one save cycle
    pub fn save(&self, world: &World) -> Result<SaveSummary> {
        fs::create_dir_all(&self.config.save_dir)?;

        let started = Instant::now();
        let metrics = SaveMetrics::from_config(&self.config, Arc::clone(&self.sink));
        tracing::info!(
            cycle = metrics.cycle(),
            entities = world.len(),
            dir = %self.config.save_dir.display(),
            "World save started"
        );

        let mut files = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let records = self.serialize_category(world.category(category), &metrics)?;
            files.push(self.write_category(category, &records, &metrics)?);
        }

        let stats = metrics.stats();
        metrics.dispose();

        let summary = SaveSummary {
            files,
            stats,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            cycle = stats.cycle,
            entries = summary.entries(),
            bytes = summary.bytes_written(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "World save complete"
        );
        Ok(summary)
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize entities in parallel, preserving world order
    fn serialize_category(
        &self,
        entities: &[Box<dyn Persistent>],
        metrics: &SaveMetrics,
    ) -> Result<Vec<SerializedRecord>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let tagged = self.config.type_tags;
        let workers = self.config.worker_threads.min(entities.len());
        let chunk_size = (entities.len() + workers - 1) / workers;

        let chunks = crossbeam::scope(|scope| {
            let handles: Vec<_> = entities
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move |_| {
                        chunk
                            .iter()
                            .map(|entity| serialize_entity(entity.as_ref(), tagged, metrics))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<std::thread::Result<Vec<_>>>()
        })
        .and_then(|joined| joined)
        .map_err(|_| SaveError::Worker("serialization worker panicked".to_string()))?;

        Ok(chunks.into_iter().flatten().collect())
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Write one category file, reporting every physical write
    ///
    /// The file is built beside its final name and renamed over it only
    /// after it is complete and synced, so a failed save leaves the previous
    /// file intact.
    fn write_category(
        &self,
        category: Category,
        records: &[SerializedRecord],
        metrics: &SaveMetrics,
    ) -> Result<SavedFile> {
        let path = self.config.save_dir.join(category.file_name());
        let temp_path = temp_path_for(&path);

        if temp_path.exists() {
            tracing::warn!(path = %temp_path.display(), "Removing stale temp file");
            let _ = fs::remove_file(&temp_path);
        }

        let staged = self
            .write_frames(&temp_path, category, records, metrics)
            .and_then(|written| {
                fs::rename(&temp_path, &path)?;
                Ok(written)
            });
        let written = match staged {
            Ok(written) => written,
            Err(e) => {
                tracing::warn!(
                    temp_path = %temp_path.display(),
                    error = %e,
                    "Save file write failed, cleaning up temp file"
                );
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        tracing::debug!(
            %category,
            entries = records.len(),
            bytes = written,
            "Wrote save file"
        );

        Ok(SavedFile {
            category,
            path,
            entries: records.len() as u64,
            bytes: written,
        })
    }

    /// Stream header, entries and footer into `path`, returning bytes written
    fn write_frames(
        &self,
        path: &Path,
        category: Category,
        records: &[SerializedRecord],
        metrics: &SaveMetrics,
    ) -> Result<u64> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let threshold = self.config.flush_threshold;
        let mut pending: Vec<u8> = Vec::with_capacity(threshold);
        let mut hasher = crc32fast::Hasher::new();
        let mut written = 0u64;

        let header = FileHeader {
            category,
            type_tags: self.config.type_tags,
        };
        pending.extend_from_slice(&header.encode());

        for record in records {
            let mut frame = BinaryWriter::with_capacity(record.bytes.len() + 32);
            encode_entry(&mut frame, record.serial, record.type_name, &record.bytes);

            hasher.update(frame.as_slice());
            pending.extend_from_slice(frame.as_slice());

            if pending.len() >= threshold {
                written += flush(&mut file, &mut pending, metrics)?;
            }
        }

        pending.extend_from_slice(&encode_footer(records.len() as u64, hasher.finalize()));
        written += flush(&mut file, &mut pending, metrics)?;
        file.sync_all()?;
        Ok(written)
    }
}

/// `items.bin` is staged as `items.bin.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Serialize one entity into its own writer and report its size
fn serialize_entity(entity: &dyn Persistent, tagged: bool, metrics: &SaveMetrics) -> SerializedRecord {
    let mut writer = if tagged {
        BinaryWriter::tagged()
    } else {
        BinaryWriter::new()
    };
    entity.serialize(&mut writer);
    metrics.on_saved(entity.category(), writer.len());

    SerializedRecord {
        serial: entity.serial(),
        type_name: entity.type_name(),
        bytes: writer.freeze(),
    }
}

/// Write buffered bytes out, then report them
fn flush(file: &mut File, pending: &mut Vec<u8>, metrics: &SaveMetrics) -> Result<u64> {
    if pending.is_empty() {
        return Ok(0);
    }
    file.write_all(pending)?;
    let len = pending.len();
    metrics.on_file_written(len);
    pending.clear();
    Ok(len as u64)
}
