//! World Loader
//!
//! Reads category files back into a [`World`]. A record that fails to
//! decode is skipped with a diagnostic; only file-level damage aborts.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::config::Config;
use crate::cursor::BinaryReader;
use crate::error::{Result, SaveError};
use crate::record::{peek_version, Category, Persistent, Serial};

use super::format::{decode_entry, decode_footer, EntryFrame, FileHeader, FOOTER_SIZE, HEADER_SIZE};
use super::{TypeRegistry, World};

/// A record that could not be loaded
#[derive(Debug)]
pub struct RecordDiagnostic {
    pub category: Category,
    pub serial: Serial,
    pub type_name: String,
    /// Leading version tag of the record, if readable
    pub stored_version: Option<i32>,
    pub error: SaveError,
}

impl fmt::Display for RecordDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}", self.category, self.serial, self.type_name)?;
        match self.stored_version {
            Some(version) => write!(f, ", version {}", version)?,
            None => write!(f, ", version unreadable")?,
        }
        write!(f, "): {}", self.error)
    }
}

/// Result of a load operation
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of entities successfully loaded
    pub entities_loaded: u64,

    /// Category files found and verified
    pub files_read: u64,

    /// Records skipped because they failed to decode
    pub diagnostics: Vec<RecordDiagnostic>,
}

impl LoadReport {
    /// Whether every record decoded
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of records skipped
    pub fn entities_skipped(&self) -> u64 {
        self.diagnostics.len() as u64
    }
}

/// Loads a world saved by [`WorldSaver`](super::WorldSaver)
pub struct WorldLoader {
    save_dir: PathBuf,
    registry: TypeRegistry,
}

impl WorldLoader {
    pub fn new(config: &Config, registry: TypeRegistry) -> Self {
        Self::open(&config.save_dir, registry)
    }

    /// Loader for an explicit save directory
    pub fn open(save_dir: &Path, registry: TypeRegistry) -> Self {
        Self {
            save_dir: save_dir.to_path_buf(),
            registry,
        }
    }

    /// Load every category file present in the save directory
    ///
    /// Missing files load as empty categories.
    pub fn load(&self) -> Result<(World, LoadReport)> {
        let mut world = World::new();
        let mut report = LoadReport::default();

        for category in Category::ALL {
            let path = self.save_dir.join(category.file_name());
            if !path.exists() {
                tracing::debug!(%category, path = %path.display(), "No save file for category");
                continue;
            }

            let data = Bytes::from(fs::read(&path)?);
            self.load_file(category, data, &mut world, &mut report)
                .map_err(|e| match e {
                    SaveError::SaveFile(msg) => {
                        SaveError::SaveFile(format!("{}: {}", path.display(), msg))
                    }
                    other => other,
                })?;
            report.files_read += 1;
        }

        if report.is_clean() {
            tracing::info!(entities = report.entities_loaded, "World load complete");
        } else {
            tracing::warn!(
                entities = report.entities_loaded,
                skipped = report.entities_skipped(),
                "World load complete with skipped records"
            );
        }

        Ok((world, report))
    }

    fn load_file(
        &self,
        category: Category,
        data: Bytes,
        world: &mut World,
        report: &mut LoadReport,
    ) -> Result<()> {
        if data.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(SaveError::SaveFile(format!(
                "file too short: {} bytes",
                data.len()
            )));
        }

        let header = FileHeader::decode(&data[..HEADER_SIZE])?;
        if header.category != category {
            return Err(SaveError::SaveFile(format!(
                "expected {} records, header says {}",
                category, header.category
            )));
        }

        let body_end = data.len() - FOOTER_SIZE;
        let (entry_count, expected_crc) = decode_footer(&data[body_end..])?;
        let body = data.slice(HEADER_SIZE..body_end);

        let actual_crc = crc32fast::hash(&body);
        if actual_crc != expected_crc {
            return Err(SaveError::SaveFile(format!(
                "checksum mismatch: expected {:08x}, computed {:08x}",
                expected_crc, actual_crc
            )));
        }

        let mut frames = BinaryReader::new(body);
        for index in 0..entry_count {
            let frame = decode_entry(&mut frames).map_err(|e| {
                SaveError::SaveFile(format!("entry {} of {} unreadable: {}", index, entry_count, e))
            })?;

            match self.decode_entity(category, &frame, header.type_tags) {
                Ok(entity) => {
                    world.add_boxed(entity);
                    report.entities_loaded += 1;
                }
                Err(error) if error.is_record_scoped() => {
                    let diagnostic = RecordDiagnostic {
                        category,
                        serial: frame.serial,
                        stored_version: peek_version(&frame.record, header.type_tags),
                        type_name: frame.type_name,
                        error,
                    };
                    tracing::warn!("Skipping record: {}", diagnostic);
                    report.diagnostics.push(diagnostic);
                }
                Err(error) => return Err(error),
            }
        }

        if !frames.is_exhausted() {
            return Err(SaveError::SaveFile(format!(
                "{} bytes after the last of {} entries",
                frames.remaining(),
                entry_count
            )));
        }

        Ok(())
    }

    /// Spawn and deserialize one entity; the record must be consumed exactly
    fn decode_entity(
        &self,
        category: Category,
        frame: &EntryFrame,
        tagged: bool,
    ) -> Result<Box<dyn Persistent>> {
        let mut entity = self.registry.spawn(&frame.type_name, frame.serial)?;
        if entity.category() != category {
            return Err(SaveError::CorruptRecord(format!(
                "{} is a {} type, found in the {} file",
                frame.type_name,
                entity.category(),
                category
            )));
        }

        let mut reader = if tagged {
            BinaryReader::tagged(frame.record.clone())
        } else {
            BinaryReader::new(frame.record.clone())
        };
        entity.deserialize(&mut reader)?;

        if !reader.is_exhausted() {
            return Err(SaveError::CorruptRecord(format!(
                "{} unread bytes after record",
                reader.remaining()
            )));
        }
        Ok(entity)
    }
}
