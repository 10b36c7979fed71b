//! Record Log Module
//!
//! The append-only file that is the only persistent state of the store.
//!
//! ## Responsibilities
//! - Append live records and hand back their starting offset
//! - Flip a record's tombstone flag in place
//! - Random reads of a record by offset
//! - Sequential scans for rebuilding the secondary index
//!
//! ## File Format
//! All integers are little-endian.
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │ Record 1 (starts at offset 0)                  │
//! │ ┌───────────┬────────────┬─────────┬─────────┐ │
//! │ │ Tomb (1)  │ KeyLen (4) │ Key     │ Val (4) │ │
//! │ └───────────┴────────────┴─────────┴─────────┘ │
//! ├────────────────────────────────────────────────┤
//! │ Record 2 (starts at 9 + len(key1))             │
//! │ ┌───────────┬────────────┬─────────┬─────────┐ │
//! │ │ Tomb (1)  │ KeyLen (4) │ Key     │ Val (4) │ │
//! │ └───────────┴────────────┴─────────┴─────────┘ │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! `Tomb` is 0 for a live record and nonzero once deleted. `KeyLen` never
//! exceeds [`MAX_KEY_LEN`]; a larger value marks the end of readable data.

mod record;
mod storage;
mod file;
mod reader;
mod recovery;

pub use record::Record;
pub use storage::LogStorage;
pub use file::LogFile;
pub use reader::LogReader;
pub use recovery::{LogRecovery, RecoveryResult};

/// Name of the log file inside the data directory
pub const LOG_FILENAME: &str = "storage.db";

/// Largest key length a record may declare
pub const MAX_KEY_LEN: usize = 256;

/// Header size: tombstone flag (1) + key length (4)
pub const HEADER_SIZE: usize = 5;

/// Trailing value size
pub const VALUE_SIZE: usize = 4;

/// Flag byte of a live record
pub(crate) const FLAG_LIVE: u8 = 0;

/// Flag byte written by a tombstone
pub(crate) const FLAG_DELETED: u8 = 1;
