//! Log storage backends
//!
//! The log only needs a seekable byte store that can be made durable.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};

/// Byte store underneath a [`LogFile`](super::LogFile)
pub trait LogStorage: Read + Write + Seek {
    /// Push written data to durable storage
    fn sync(&mut self) -> io::Result<()>;
}

impl LogStorage for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// In-memory log, used for tests and throwaway engines
impl LogStorage for Cursor<Vec<u8>> {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}
