//! Log Recovery
//!
//! Rebuilds the secondary index by replaying the log on startup.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;
use crate::index::{IndexEntry, SecondaryIndex};
use super::LogReader;

/// Handles index rebuild from the log
pub struct LogRecovery;

/// Result of a recovery operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of records decoded, live or not
    pub records_scanned: u64,

    /// Number of live records decoded
    pub live_records: u64,

    /// Number of tombstoned records skipped
    pub tombstoned_records: u64,

    /// Live records shadowed by a later record with the same key and value
    pub duplicates_collapsed: u64,

    /// Byte length of the decodable prefix of the log
    pub valid_len: u64,

    /// Bytes after the decodable prefix that were ignored
    pub trailing_bytes: u64,
}

impl RecoveryResult {
    /// Whether the scan stopped before end-of-file
    pub fn was_truncated(&self) -> bool {
        self.trailing_bytes > 0
    }
}

impl LogRecovery {
    /// Replay a log from a reader positioned at offset 0
    ///
    /// This will:
    /// 1. Decode records front to back
    /// 2. Stop at the first record that fails to decode; the rest of the
    ///    log is left untouched and ignored
    /// 3. Collect `(value, offset)` for every live record
    /// 4. Sort each key's values once at the end
    pub fn rebuild<R: Read>(mut reader: LogReader<R>) -> Result<(SecondaryIndex, RecoveryResult)> {
        let mut result = RecoveryResult::default();
        let mut live = Vec::new();

        while let Some((offset, record)) = reader.next_record()? {
            result.records_scanned += 1;
            if record.tombstone {
                result.tombstoned_records += 1;
                continue;
            }
            result.live_records += 1;
            live.push((
                record.key,
                IndexEntry {
                    value: record.value,
                    offset,
                },
            ));
        }

        result.valid_len = reader.position();
        result.trailing_bytes = reader.trailing_bytes();

        let (index, duplicates) = SecondaryIndex::rebuild(live);
        result.duplicates_collapsed = duplicates as u64;

        if result.was_truncated() {
            tracing::warn!(
                valid_len = result.valid_len,
                trailing_bytes = result.trailing_bytes,
                "log has an undecodable tail; ignoring it"
            );
        }
        if duplicates > 0 {
            tracing::warn!(duplicates, "log holds duplicate live records; indexing the latest");
        }

        Ok((index, result))
    }

    /// Rebuild an index from a log file without opening it for writing
    pub fn recover(path: &Path) -> Result<(SecondaryIndex, RecoveryResult)> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Self::rebuild(LogReader::new(BufReader::new(file), len))
    }

    /// Verify integrity of a log file without modifying it
    ///
    /// Runs the same scan as [`recover`](Self::recover) and keeps only the
    /// statistics.
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let (_, result) = Self::recover(path)?;
        Ok(result)
    }
}
