//! Log File
//!
//! Appends records, flips tombstones, and reads records back by offset.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::LogSyncStrategy;
use crate::error::{LogdexError, Result};
use super::{LogReader, LogStorage, Record, FLAG_DELETED};

/// Handle to the record log
///
/// Writes are unbuffered: every append or tombstone reaches the storage
/// before the call returns.
pub struct LogFile<S = File> {
    /// Underlying byte store
    storage: S,

    /// How hard to push each write to disk
    sync_strategy: LogSyncStrategy,

    /// Current end-of-file offset
    len: u64,
}

impl LogFile<File> {
    /// Open or create a log file
    pub fn open(path: &Path, sync_strategy: LogSyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        Self::new(file, sync_strategy)
    }
}

impl<S: LogStorage> LogFile<S> {
    /// Wrap an existing storage; its current contents are the log
    pub fn new(mut storage: S, sync_strategy: LogSyncStrategy) -> Result<Self> {
        let len = storage.seek(SeekFrom::End(0))?;
        Ok(Self {
            storage,
            sync_strategy,
            len,
        })
    }

    /// Append a live record, returning the offset it starts at
    ///
    /// The record is encoded up front and written with a single call so a
    /// failed write leaves at most one partial record at the tail.
    pub fn append(&mut self, key: &[u8], value: i32) -> Result<u64> {
        let bytes = Record::live(key, value).encode()?;

        let offset = self.storage.seek(SeekFrom::End(0))?;
        self.storage.write_all(&bytes)?;
        self.commit()?;

        self.len = offset + bytes.len() as u64;
        tracing::trace!(offset, len = bytes.len(), "appended record");
        Ok(offset)
    }

    /// Mark the record at `offset` as deleted
    ///
    /// Only the flag byte is overwritten. The offset must be the start of a
    /// live record for `key` and `value` written by [`append`](Self::append);
    /// anything else means the caller's bookkeeping is broken and yields
    /// `IndexDesync` without touching the log.
    pub fn tombstone(&mut self, offset: u64, key: &[u8], value: i32) -> Result<Record> {
        let mut record = match self.read_at(offset)? {
            Some(record) if record.key == key && record.value == value => record,
            Some(_) => {
                tracing::error!(offset, "record at offset does not match the expected key/value");
                return Err(LogdexError::IndexDesync { offset });
            }
            None => return Err(LogdexError::IndexDesync { offset }),
        };

        self.storage.seek(SeekFrom::Start(offset))?;
        self.storage.write_all(&[FLAG_DELETED])?;
        self.commit()?;

        tracing::trace!(offset, "tombstoned record");
        record.tombstone = true;
        Ok(record)
    }

    /// Read the live record at `offset`
    ///
    /// Returns `None` if the record is tombstoned, runs past end-of-file, or
    /// declares an oversized key.
    pub fn read_at(&mut self, offset: u64) -> Result<Option<Record>> {
        if offset >= self.len {
            return Ok(None);
        }

        self.storage.seek(SeekFrom::Start(offset))?;
        let record = Record::read_from(&mut self.storage)?;
        Ok(record.filter(|r| !r.tombstone))
    }

    /// Sequential reader over the whole log, starting at offset 0
    pub fn reader(&mut self) -> Result<LogReader<BufReader<&mut S>>> {
        self.storage.seek(SeekFrom::Start(0))?;
        Ok(LogReader::new(BufReader::new(&mut self.storage), self.len))
    }

    /// Current end-of-file offset
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the log holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Force data to durable storage regardless of strategy
    pub fn sync(&mut self) -> Result<()> {
        self.storage.flush()?;
        self.storage.sync()?;
        Ok(())
    }

    /// Give the storage back
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Finish a write according to the sync strategy
    fn commit(&mut self) -> Result<()> {
        self.storage.flush()?;
        if self.sync_strategy == LogSyncStrategy::EveryWrite {
            self.storage.sync()?;
        }
        Ok(())
    }
}
