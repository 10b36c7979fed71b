//! Configuration for logdex
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a logdex instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the log file
    /// Internal structure:
    ///   {data_dir}/
    ///     └── storage.db       (append-only record log)
    pub data_dir: PathBuf,

    /// Create the data directory and an empty log when none exists
    pub create_if_missing: bool,

    // -------------------------------------------------------------------------
    // Log Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: what "durable" means after each write
    pub sync_strategy: LogSyncStrategy,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSyncStrategy {
    /// Hand every write to the OS before returning (no user-space buffering)
    Flush,

    /// Additionally fsync file data after every append and tombstone
    EveryWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            create_if_missing: true,
            sync_strategy: LogSyncStrategy::Flush,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the log file inside `data_dir`
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(crate::log::LOG_FILENAME)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set whether a missing log is created on open
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Set the log sync strategy
    pub fn sync_strategy(mut self, strategy: LogSyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
