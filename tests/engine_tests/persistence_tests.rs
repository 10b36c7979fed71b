//! Restart and recovery tests

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use logdex::config::Config;
use logdex::engine::Engine;
use logdex::log::{LogRecovery, Record};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn open(dir: &Path) -> Engine {
    Engine::open(Config::builder().data_dir(dir).build()).unwrap()
}

fn append_raw(dir: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(dir.join("storage.db"))
        .unwrap();
    file.write_all(bytes).unwrap();
}

// =============================================================================
// Restart Tests
// =============================================================================

#[test]
fn test_restart_persistence() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        engine.insert(b"a", 5).unwrap();
        engine.insert(b"a", 3).unwrap();
        engine.close().unwrap();
    }

    let engine = open(temp.path());

    assert_eq!(engine.find(b"a"), vec![3, 5]);
    assert_eq!(engine.recovery().live_records, 2);
}

#[test]
fn test_restart_without_close() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        engine.insert(b"a", 1).unwrap();
        // Dropped without close()
    }

    assert_eq!(open(temp.path()).find(b"a"), vec![1]);
}

#[test]
fn test_tombstone_survives_restart() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        engine.insert(b"k", 1).unwrap();
        engine.insert(b"k", 2).unwrap();
        engine.remove(b"k", 2).unwrap();
        engine.close().unwrap();
    }

    let engine = open(temp.path());

    assert_eq!(engine.find(b"k"), vec![1]);
    assert_eq!(engine.recovery().tombstoned_records, 1);
}

#[test]
fn test_reinsert_after_remove_survives_restart() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        engine.insert(b"k", 7).unwrap();
        engine.remove(b"k", 7).unwrap();
        engine.insert(b"k", 7).unwrap();
        engine.close().unwrap();
    }

    let engine = open(temp.path());

    assert_eq!(engine.find(b"k"), vec![7]);
    assert_eq!(engine.recovery().records_scanned, 2);
    assert_eq!(engine.recovery().tombstoned_records, 1);
}

#[test]
fn test_duplicate_insert_after_restart_is_noop() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        engine.insert(b"k", 1).unwrap();
    }

    let mut engine = open(temp.path());
    let len = engine.log_len();

    assert!(!engine.insert(b"k", 1).unwrap());
    assert_eq!(engine.log_len(), len);
}

#[test]
fn test_remove_after_restart_uses_rebuilt_offsets() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        for v in [30, 10, 20] {
            engine.insert(b"a", v).unwrap();
            engine.insert(b"b", v).unwrap();
        }
    }

    {
        let mut engine = open(temp.path());
        engine.remove(b"a", 10).unwrap();
        engine.remove(b"b", 30).unwrap();
    }

    let engine = open(temp.path());
    assert_eq!(engine.find(b"a"), vec![20, 30]);
    assert_eq!(engine.find(b"b"), vec![10, 20]);
}

#[test]
fn test_remove_tombstones_duplicate_live_records() {
    let temp = TempDir::new().unwrap();
    // A log holding the same live (key, value) three times
    let mut log = Vec::new();
    for value in [4, 4, 9, 4] {
        log.extend_from_slice(&Record::live(b"k".to_vec(), value).encode().unwrap());
    }
    fs::write(temp.path().join("storage.db"), &log).unwrap();

    {
        let mut engine = open(temp.path());
        assert_eq!(engine.recovery().duplicates_collapsed, 2);
        assert!(engine.remove(b"k", 4).unwrap());
        engine.close().unwrap();
    }

    let engine = open(temp.path());
    assert_eq!(engine.find(b"k"), vec![9]);
    assert_eq!(engine.recovery().tombstoned_records, 3);
    assert_eq!(engine.recovery().duplicates_collapsed, 0);
}

#[test]
fn test_many_operations_survive_restart() {
    let temp = TempDir::new().unwrap();
    let mut expected = std::collections::BTreeMap::<String, Vec<i32>>::new();
    {
        let mut engine = open(temp.path());
        for i in 0..200i32 {
            let key = format!("key{}", i % 7);
            let value = (i * 37) % 50;
            engine.insert(key.as_bytes(), value).unwrap();
            if i % 3 == 0 {
                engine.remove(key.as_bytes(), (i * 11) % 50).unwrap();
            }
        }
        for i in 0..7 {
            let key = format!("key{}", i);
            expected.insert(key.clone(), engine.find(key.as_bytes()));
        }
    }

    let engine = open(temp.path());
    for (key, values) in &expected {
        assert_eq!(&engine.find(key.as_bytes()), values, "key {}", key);
    }
}

// =============================================================================
// Damaged Log Tests
// =============================================================================

#[test]
fn test_partial_tail_is_ignored_and_kept() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        engine.insert(b"a", 1).unwrap();
    }
    let mut partial = Record::live(b"a".to_vec(), 2).encode().unwrap().to_vec();
    partial.truncate(6);
    append_raw(temp.path(), &partial);
    let len_with_tail = fs::metadata(temp.path().join("storage.db")).unwrap().len();

    let engine = open(temp.path());

    assert_eq!(engine.find(b"a"), vec![1]);
    assert!(engine.recovery().was_truncated());
    assert_eq!(engine.log_len(), len_with_tail);
}

#[test]
fn test_append_after_corrupt_tail_is_unreachable() {
    let temp = TempDir::new().unwrap();
    {
        let mut engine = open(temp.path());
        engine.insert(b"a", 1).unwrap();
    }
    append_raw(temp.path(), &[0u8; 2]);

    {
        let mut engine = open(temp.path());
        engine.insert(b"a", 2).unwrap();
        // Live for this run
        assert_eq!(engine.find(b"a"), vec![1, 2]);
    }

    // The new record sits after the undecodable bytes, so a rebuild
    // never reaches it.
    let engine = open(temp.path());
    assert_eq!(engine.find(b"a"), vec![1]);

    let result = LogRecovery::verify(&temp.path().join("storage.db")).unwrap();
    assert!(result.was_truncated());
}
