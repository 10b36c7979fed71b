//! Secondary index implementation

use std::collections::HashMap;

use super::IndexEntry;

/// Outcome of searching a key for a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The value is present at `position`, backed by the record at `offset`
    Found { position: usize, offset: u64 },

    /// The value is absent and belongs at `position`
    Vacant { position: usize },
}

/// Key → values sorted ascending, each with its record offset
///
/// Invariants per key: entries sorted by value, values unique, vector
/// never empty (empty keys are dropped).
#[derive(Debug, Default)]
pub struct SecondaryIndex {
    entries: HashMap<Vec<u8>, Vec<IndexEntry>>,

    /// Indexed offset → older live records with the same key and value,
    /// oldest first. Only non-empty after rebuilding a log with duplicates.
    shadowed: HashMap<u64, Vec<u64>>,

    /// Total entries across all keys
    value_count: usize,
}

impl SecondaryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from live records in log order
    ///
    /// Pairs are grouped per key and sorted once at the end. If a key holds
    /// the same value twice, the later record is indexed and the earlier
    /// offsets are remembered as shadowed by it. Returns the index and the
    /// number of duplicates collapsed.
    pub fn rebuild<I>(records: I) -> (Self, usize)
    where
        I: IntoIterator<Item = (Vec<u8>, IndexEntry)>,
    {
        let mut entries: HashMap<Vec<u8>, Vec<IndexEntry>> = HashMap::new();
        for (key, entry) in records {
            entries.entry(key).or_default().push(entry);
        }

        let mut shadowed: HashMap<u64, Vec<u64>> = HashMap::new();
        let mut duplicates = 0;
        let mut value_count = 0;
        for values in entries.values_mut() {
            // Stable sort keeps log order among equal values
            values.sort_by_key(|e| e.value);

            let mut kept: Vec<IndexEntry> = Vec::with_capacity(values.len());
            for entry in values.drain(..) {
                match kept.last_mut() {
                    Some(last) if last.value == entry.value => {
                        let older = std::mem::replace(last, entry);
                        let mut earlier = shadowed.remove(&older.offset).unwrap_or_default();
                        earlier.push(older.offset);
                        shadowed.insert(entry.offset, earlier);
                        duplicates += 1;
                    }
                    _ => kept.push(entry),
                }
            }

            value_count += kept.len();
            *values = kept;
        }

        (
            Self {
                entries,
                shadowed,
                value_count,
            },
            duplicates,
        )
    }

    /// Binary-search `key` for `value`
    ///
    /// An unknown key behaves like an empty one.
    pub fn search(&self, key: &[u8], value: i32) -> Lookup {
        let values = match self.entries.get(key) {
            Some(values) => values,
            None => return Lookup::Vacant { position: 0 },
        };

        match values.binary_search_by_key(&value, |e| e.value) {
            Ok(position) => Lookup::Found {
                position,
                offset: values[position].offset,
            },
            Err(position) => Lookup::Vacant { position },
        }
    }

    /// Whether `key` currently holds `value`
    pub fn contains(&self, key: &[u8], value: i32) -> bool {
        matches!(self.search(key, value), Lookup::Found { .. })
    }

    /// Insert at a position returned by [`search`](Self::search) as `Vacant`
    pub fn insert_at(&mut self, key: &[u8], position: usize, entry: IndexEntry) {
        let values = self.entries.entry(key.to_vec()).or_default();

        debug_assert!(position == 0 || values[position - 1].value < entry.value);
        debug_assert!(position == values.len() || values[position].value > entry.value);

        values.insert(position, entry);
        self.value_count += 1;
    }

    /// Remove the entry at a position returned by [`search`](Self::search)
    /// as `Found`, dropping the key once it has no values left
    pub fn remove_at(&mut self, key: &[u8], position: usize) -> Option<IndexEntry> {
        let values = self.entries.get_mut(key)?;
        if position >= values.len() {
            return None;
        }

        let removed = values.remove(position);
        self.value_count -= 1;
        if values.is_empty() {
            self.entries.remove(key);
        }
        self.shadowed.remove(&removed.offset);
        Some(removed)
    }

    /// Offsets of older live records with the same key and value as the
    /// record at `offset`, oldest first
    pub fn shadowed(&self, offset: u64) -> &[u64] {
        self.shadowed.get(&offset).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries for `key`, ascending by value
    pub fn entries(&self, key: &[u8]) -> &[IndexEntry] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Values for `key`, ascending
    pub fn values(&self, key: &[u8]) -> Vec<i32> {
        self.entries(key).iter().map(|e| e.value).collect()
    }

    /// Number of keys with at least one value
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of live values across all keys
    pub fn value_count(&self) -> usize {
        self.value_count
    }

    /// Whether the index holds no values
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
