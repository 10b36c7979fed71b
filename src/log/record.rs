//! Log record definitions
//!
//! Defines the on-disk unit of the log and its encoding.

use std::io::{self, Read};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{LogdexError, Result};
use super::{FLAG_DELETED, FLAG_LIVE, HEADER_SIZE, MAX_KEY_LEN, VALUE_SIZE};

/// A single record in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Set once the record has been deleted
    pub tombstone: bool,

    /// Raw key bytes
    pub key: Vec<u8>,

    /// Stored value
    pub value: i32,
}

impl Record {
    /// Create a live record
    pub fn live(key: impl Into<Vec<u8>>, value: i32) -> Self {
        Self {
            tombstone: false,
            key: key.into(),
            value,
        }
    }

    /// Number of bytes this record occupies on disk
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.key.len() + VALUE_SIZE
    }

    /// Serialize the record
    ///
    /// Fails with `KeyTooLong` rather than produce bytes a scan would reject.
    pub fn encode(&self) -> Result<Bytes> {
        if self.key.len() > MAX_KEY_LEN {
            return Err(LogdexError::KeyTooLong {
                len: self.key.len(),
                max: MAX_KEY_LEN,
            });
        }

        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u8(if self.tombstone { FLAG_DELETED } else { FLAG_LIVE });
        buf.put_u32_le(self.key.len() as u32);
        buf.put_slice(&self.key);
        buf.put_i32_le(self.value);

        Ok(buf.freeze())
    }

    /// Decode a record from the front of `bytes`
    ///
    /// Returns the record and the number of bytes it used, or `None` when
    /// the bytes do not hold a complete, well-formed record.
    pub fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
        let mut buf = bytes;
        if buf.remaining() < HEADER_SIZE {
            return None;
        }

        let flag = buf.get_u8();
        let key_len = buf.get_u32_le() as usize;
        if key_len > MAX_KEY_LEN || buf.remaining() < key_len + VALUE_SIZE {
            return None;
        }

        let key = buf[..key_len].to_vec();
        buf.advance(key_len);
        let value = buf.get_i32_le();

        let record = Self {
            tombstone: flag != FLAG_LIVE,
            key,
            value,
        };
        let used = record.encoded_len();
        Some((record, used))
    }

    /// Read one record from a byte stream
    ///
    /// `Ok(None)` covers both a clean end of stream and an undecodable
    /// record (short read or oversized key length). Other I/O errors
    /// propagate.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Option<Self>> {
        let mut header = [0u8; HEADER_SIZE];
        if !read_fully(reader, &mut header)? {
            return Ok(None);
        }

        let mut head = &header[..];
        let flag = head.get_u8();
        let key_len = head.get_u32_le() as usize;
        if key_len > MAX_KEY_LEN {
            return Ok(None);
        }

        let mut key = vec![0u8; key_len];
        if !read_fully(reader, &mut key)? {
            return Ok(None);
        }

        let mut value = [0u8; VALUE_SIZE];
        if !read_fully(reader, &mut value)? {
            return Ok(None);
        }

        Ok(Some(Self {
            tombstone: flag != FLAG_LIVE,
            key,
            value: (&value[..]).get_i32_le(),
        }))
    }
}

/// `read_exact` that maps an under-run to `false`
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}
