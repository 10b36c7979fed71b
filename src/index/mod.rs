//! Secondary Index Module
//!
//! In-memory map from key to the sorted values stored under it.
//!
//! ## Responsibilities
//! - Logarithmic duplicate checks on insert
//! - Remember the log offset of every live value so deletes never scan
//! - Serve `find` without sorting at query time
//!
//! ## Data Structure Choice
//! `HashMap<key, Vec<IndexEntry>>` with each vector kept sorted by value:
//! - Binary search for lookup and the insertion point
//! - Keys have no ordering requirement, values do
//! - Vectors stay small per key; shifting on insert is cheap in practice

mod table;

pub use table::{Lookup, SecondaryIndex};

/// One live value and where its record lives in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Stored value
    pub value: i32,

    /// Starting offset of the live record holding `value`
    pub offset: u64,
}
