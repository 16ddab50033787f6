//! Configuration for worldsave
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SaveError};

/// Main configuration for a save/load pipeline
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding one save file per category
    /// Internal structure:
    ///   {save_dir}/
    ///     ├── items.bin
    ///     ├── mobiles.bin
    ///     ├── guilds.bin
    ///     └── data.bin
    pub save_dir: PathBuf,

    /// Buffered bytes that trigger a physical write
    pub flush_threshold: usize,

    /// Emit and verify one-byte primitive type tags in records
    pub type_tags: bool,

    // -------------------------------------------------------------------------
    // Save Cycle Configuration
    // -------------------------------------------------------------------------
    /// Threads serializing entities in parallel during a save
    pub worker_threads: usize,

    // -------------------------------------------------------------------------
    // Metrics Configuration
    // -------------------------------------------------------------------------
    /// Report save throughput to the counter sink
    pub metrics_enabled: bool,

    /// Counter category registered with the sink
    pub counter_category: String,

    /// Human-readable description of the counter category
    pub counter_category_description: String,
}

impl Default for Config {
    fn default() -> Self {
        let worker_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            save_dir: PathBuf::from("./world_save"),
            flush_threshold: 64 * 1024, // 64 KB
            type_tags: false,
            worker_threads,
            metrics_enabled: true,
            counter_category: "WorldSave".to_string(),
            counter_category_description: "Performance counters for world saves".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the save pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(SaveError::Config("worker_threads must be at least 1".to_string()));
        }
        if self.flush_threshold == 0 {
            return Err(SaveError::Config("flush_threshold must be non-zero".to_string()));
        }
        if self.counter_category.trim().is_empty() {
            return Err(SaveError::Config("counter_category must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the save directory
    pub fn save_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.save_dir = path.into();
        self
    }

    /// Set the flush threshold (in bytes)
    pub fn flush_threshold(mut self, bytes: usize) -> Self {
        self.config.flush_threshold = bytes;
        self
    }

    /// Enable or disable primitive type tags
    pub fn type_tags(mut self, enabled: bool) -> Self {
        self.config.type_tags = enabled;
        self
    }

    /// Set the number of serialization worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Enable or disable save metrics
    pub fn metrics_enabled(mut self, enabled: bool) -> Self {
        self.config.metrics_enabled = enabled;
        self
    }

    /// Set the counter category name
    pub fn counter_category(mut self, name: impl Into<String>) -> Self {
        self.config.counter_category = name.into();
        self
    }

    /// Set the counter category description
    pub fn counter_category_description(mut self, description: impl Into<String>) -> Self {
        self.config.counter_category_description = description.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
