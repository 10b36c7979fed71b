//! Engine Module
//!
//! The storage engine that ties the log and the secondary index together.
//!
//! ## Responsibilities
//! - Rebuild the index from the log on open
//! - Keep the index and the log consistent on every insert/remove
//! - Answer finds from memory alone

use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;

use crate::config::Config;
use crate::error::{LogdexError, Result};
use crate::index::{IndexEntry, Lookup, SecondaryIndex};
use crate::log::{LogFile, LogRecovery, LogStorage, RecoveryResult};
use crate::protocol::{Command, Response};

/// The main storage engine
///
/// ## Ownership
///
/// The engine owns the only handle to the log and the only copy of the
/// index. The log is the source of truth; the index is rebuilt from it on
/// every open. Mutating operations take `&mut self`, so calls are applied
/// strictly in the order they are made.
///
/// The log handle is released when the engine is dropped. [`close`](Self::close)
/// additionally forces a final sync.
pub struct Engine<S: LogStorage = File> {
    /// Engine configuration
    config: Config,

    /// Append-only record log
    log: LogFile<S>,

    /// Key → sorted (value, offset) pairs
    index: SecondaryIndex,

    /// Stats from the rebuild performed at open
    recovery: RecoveryResult,
}

impl Engine<File> {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if allowed
    /// 2. Open (or create) the log file
    /// 3. Rebuild the index by scanning the log
    pub fn open(config: Config) -> Result<Self> {
        let log_path = config.log_path();

        if !log_path.exists() {
            if !config.create_if_missing {
                return Err(LogdexError::Config(format!(
                    "log file {} does not exist",
                    log_path.display()
                )));
            }
            fs::create_dir_all(&config.data_dir)?;
        }

        let log = LogFile::open(&log_path, config.sync_strategy)?;
        tracing::info!(path = %log_path.display(), len = log.len(), "opened log");

        Self::from_log(log, config)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }
}

impl Engine<Cursor<Vec<u8>>> {
    /// Engine over an empty in-memory log
    pub fn in_memory() -> Result<Self> {
        Self::with_storage(Cursor::new(Vec::new()), Config::default())
    }
}

impl<S: LogStorage> Engine<S> {
    /// Open an engine over arbitrary log storage
    ///
    /// The storage's current contents are replayed exactly like a file on
    /// disk; `config.data_dir` is ignored.
    pub fn with_storage(storage: S, config: Config) -> Result<Self> {
        let log = LogFile::new(storage, config.sync_strategy)?;
        Self::from_log(log, config)
    }

    fn from_log(mut log: LogFile<S>, config: Config) -> Result<Self> {
        let (index, recovery) = LogRecovery::rebuild(log.reader()?)?;

        tracing::info!(
            records = recovery.records_scanned,
            live = recovery.live_records,
            tombstoned = recovery.tombstoned_records,
            keys = index.key_count(),
            "index rebuilt from log"
        );

        Ok(Self {
            config,
            log,
            index,
            recovery,
        })
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        match command {
            Command::Insert { key, value } => {
                self.insert(&key, value)?;
                Ok(Response::Empty)
            }
            Command::Delete { key, value } => {
                self.remove(&key, value)?;
                Ok(Response::Empty)
            }
            Command::Find { key } => Ok(Response::from_values(self.find(&key))),
        }
    }

    /// Associate `value` with `key`
    ///
    /// A value the key already holds is a no-op: nothing is written. A new
    /// value appends exactly one record. Returns whether a record was written.
    pub fn insert(&mut self, key: &[u8], value: i32) -> Result<bool> {
        let position = match self.index.search(key, value) {
            Lookup::Found { .. } => {
                tracing::debug!(key = %String::from_utf8_lossy(key), value, "insert: already present");
                return Ok(false);
            }
            Lookup::Vacant { position } => position,
        };

        let offset = self.log.append(key, value)?;
        self.index.insert_at(key, position, IndexEntry { value, offset });

        tracing::debug!(key = %String::from_utf8_lossy(key), value, offset, "insert");
        Ok(true)
    }

    /// Remove `value` from `key`
    ///
    /// Unknown keys and absent values are a no-op. Otherwise the record is
    /// tombstoned in place using the offset kept in the index; no scan.
    /// Older live copies collapsed at rebuild are tombstoned first, so the
    /// value cannot come back on the next open. Returns whether a record was
    /// tombstoned.
    pub fn remove(&mut self, key: &[u8], value: i32) -> Result<bool> {
        let (position, offset) = match self.index.search(key, value) {
            Lookup::Found { position, offset } => (position, offset),
            Lookup::Vacant { .. } => {
                tracing::debug!(key = %String::from_utf8_lossy(key), value, "remove: not present");
                return Ok(false);
            }
        };

        let older = self.index.shadowed(offset).to_vec();
        for shadowed in older {
            self.log.tombstone(shadowed, key, value)?;
        }
        self.log.tombstone(offset, key, value)?;
        self.index.remove_at(key, position);

        tracing::debug!(key = %String::from_utf8_lossy(key), value, offset, "remove");
        Ok(true)
    }

    /// Values stored under `key`, ascending
    ///
    /// Empty when the key is unknown.
    pub fn find(&self, key: &[u8]) -> Vec<i32> {
        self.index.values(key)
    }

    /// Close the engine gracefully
    ///
    /// Syncs the log to disk before releasing it
    pub fn close(mut self) -> Result<()> {
        self.log.sync()
    }

    /// Close the engine and hand back its log storage
    pub fn into_storage(mut self) -> Result<S> {
        self.log.sync()?;
        Ok(self.log.into_inner())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of keys with at least one live value
    pub fn key_count(&self) -> usize {
        self.index.key_count()
    }

    /// Number of live values across all keys
    pub fn value_count(&self) -> usize {
        self.index.value_count()
    }

    /// Current byte length of the log
    pub fn log_len(&self) -> u64 {
        self.log.len()
    }

    /// Stats from the rebuild performed at open
    pub fn recovery(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// Read-only view of the index
    pub fn index(&self) -> &SecondaryIndex {
        &self.index
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
