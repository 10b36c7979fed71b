//! Log Reader
//!
//! Sequential scan over the records of a log.

use std::io::Read;

use crate::error::Result;
use super::Record;

/// Reads records front to back, stopping at the first undecodable one
pub struct LogReader<R> {
    reader: R,

    /// Offset just past the last fully decoded record
    position: u64,

    /// Total byte length of the log being scanned
    total_len: u64,

    /// Set once a record failed to decode or the end was reached
    done: bool,
}

impl<R: Read> LogReader<R> {
    /// Scan `reader`, which must be positioned at offset 0 of a log that is
    /// `total_len` bytes long
    pub fn new(reader: R, total_len: u64) -> Self {
        Self {
            reader,
            position: 0,
            total_len,
            done: false,
        }
    }

    /// Read the next record together with its starting offset
    ///
    /// Tombstoned records are returned too; callers decide what to skip.
    pub fn next_record(&mut self) -> Result<Option<(u64, Record)>> {
        if self.done || self.position >= self.total_len {
            self.done = true;
            return Ok(None);
        }

        match Record::read_from(&mut self.reader)? {
            Some(record) => {
                let offset = self.position;
                self.position += record.encoded_len() as u64;
                Ok(Some((offset, record)))
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    /// Offset just past the last record returned
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes after [`position`](Self::position) that could not be decoded
    ///
    /// Only meaningful once the reader is exhausted.
    pub fn trailing_bytes(&self) -> u64 {
        self.total_len.saturating_sub(self.position)
    }
}

impl<R: Read> Iterator for LogReader<R> {
    type Item = Result<(u64, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next_record();
        if next.is_err() {
            self.done = true;
        }
        next.transpose()
    }
}
