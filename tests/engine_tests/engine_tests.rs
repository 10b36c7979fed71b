//! Engine operation tests

use logdex::config::{Config, LogSyncStrategy};
use logdex::engine::Engine;
use logdex::log::{HEADER_SIZE, MAX_KEY_LEN, VALUE_SIZE};
use logdex::protocol::{Command, Response};
use logdex::LogdexError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(LogSyncStrategy::EveryWrite)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn record_len(key: &[u8]) -> u64 {
    (HEADER_SIZE + key.len() + VALUE_SIZE) as u64
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_engine_open_creates_directories() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mydb");

    let config = Config::builder().data_dir(&data_dir).build();

    let _engine = Engine::open(config).unwrap();

    assert!(data_dir.exists());
    assert!(data_dir.join("storage.db").exists());
}

#[test]
fn test_engine_open_without_create() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path().join("missing"))
        .create_if_missing(false)
        .build();

    let result = Engine::open(config);

    assert!(matches!(result, Err(LogdexError::Config(_))));
    assert!(!temp_dir.path().join("missing").exists());
}

#[test]
fn test_engine_insert_find() {
    let (_temp, mut engine) = setup_temp_engine();

    assert!(engine.insert(b"a", 10).unwrap());

    assert_eq!(engine.find(b"a"), vec![10]);
}

#[test]
fn test_engine_find_unknown_key() {
    let (_temp, engine) = setup_temp_engine();

    assert!(engine.find(b"nonexistent").is_empty());
}

#[test]
fn test_engine_find_is_sorted() {
    let (_temp, mut engine) = setup_temp_engine();

    for value in [42, -7, 0, 1000, 3, i32::MIN, i32::MAX] {
        engine.insert(b"k", value).unwrap();
    }

    assert_eq!(engine.find(b"k"), vec![i32::MIN, -7, 0, 3, 42, 1000, i32::MAX]);
}

#[test]
fn test_engine_duplicate_insert_is_noop() {
    let (_temp, mut engine) = setup_temp_engine();

    assert!(engine.insert(b"a", 1).unwrap());
    let len_after_one = engine.log_len();
    assert!(!engine.insert(b"a", 1).unwrap());

    assert_eq!(engine.log_len(), len_after_one);
    assert_eq!(engine.find(b"a"), vec![1]);
    assert_eq!(engine.value_count(), 1);
}

#[test]
fn test_engine_insert_grows_log_by_one_record() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert(b"abc", 1).unwrap();
    engine.insert(b"abc", 2).unwrap();

    assert_eq!(engine.log_len(), 2 * record_len(b"abc"));
}

#[test]
fn test_engine_remove() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"a", 10).unwrap();
    engine.insert(b"a", 5).unwrap();

    assert!(engine.remove(b"a", 10).unwrap());

    assert_eq!(engine.find(b"a"), vec![5]);
}

#[test]
fn test_engine_remove_does_not_grow_log() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"a", 10).unwrap();
    let len = engine.log_len();

    engine.remove(b"a", 10).unwrap();

    assert_eq!(engine.log_len(), len);
}

#[test]
fn test_engine_remove_last_value_drops_key() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"a", 1).unwrap();

    engine.remove(b"a", 1).unwrap();

    assert!(engine.find(b"a").is_empty());
    assert_eq!(engine.key_count(), 0);
}

#[test]
fn test_engine_remove_unknown_is_noop() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"a", 1).unwrap();

    assert!(!engine.remove(b"a", 2).unwrap());
    assert!(!engine.remove(b"b", 1).unwrap());

    assert_eq!(engine.find(b"a"), vec![1]);
}

#[test]
fn test_engine_remove_twice() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"a", 1).unwrap();

    assert!(engine.remove(b"a", 1).unwrap());
    assert!(!engine.remove(b"a", 1).unwrap());
}

#[test]
fn test_engine_reinsert_after_remove() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"k", 4).unwrap();
    engine.remove(b"k", 4).unwrap();
    let len = engine.log_len();

    assert!(engine.insert(b"k", 4).unwrap());

    assert_eq!(engine.find(b"k"), vec![4]);
    assert_eq!(engine.log_len(), len + record_len(b"k"));
}

#[test]
fn test_engine_keys_are_independent() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"y", 1).unwrap();
    engine.insert(b"y", 2).unwrap();

    engine.insert(b"x", 1).unwrap();
    engine.insert(b"x", 3).unwrap();
    engine.remove(b"x", 1).unwrap();
    engine.remove(b"x", 3).unwrap();

    assert_eq!(engine.find(b"y"), vec![1, 2]);
    assert!(engine.find(b"x").is_empty());
}

#[test]
fn test_engine_key_too_long() {
    let (_temp, mut engine) = setup_temp_engine();
    let key = vec![b'k'; MAX_KEY_LEN + 1];

    let result = engine.insert(&key, 1);

    assert!(matches!(result, Err(LogdexError::KeyTooLong { .. })));
    assert!(engine.find(&key).is_empty());
    assert_eq!(engine.log_len(), 0);
}

#[test]
fn test_engine_key_at_max_len() {
    let (_temp, mut engine) = setup_temp_engine();
    let key = vec![b'k'; MAX_KEY_LEN];

    engine.insert(&key, 1).unwrap();

    assert_eq!(engine.find(&key), vec![1]);
}

#[test]
fn test_engine_accessors() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(b"a", 1).unwrap();
    engine.insert(b"a", 2).unwrap();
    engine.insert(b"b", 1).unwrap();

    assert_eq!(engine.key_count(), 2);
    assert_eq!(engine.value_count(), 3);
    assert!(engine.index().contains(b"a", 2));
    assert!(!engine.index().contains(b"b", 2));
    assert_eq!(engine.config().sync_strategy, LogSyncStrategy::EveryWrite);
    assert_eq!(engine.recovery().records_scanned, 0);
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_engine_execute_commands() {
    let (_temp, mut engine) = setup_temp_engine();

    let insert = engine
        .execute(Command::Insert { key: b"a".to_vec(), value: 10 })
        .unwrap();
    engine
        .execute(Command::Insert { key: b"a".to_vec(), value: 5 })
        .unwrap();
    let delete = engine
        .execute(Command::Delete { key: b"a".to_vec(), value: 10 })
        .unwrap();
    let found = engine.execute(Command::Find { key: b"a".to_vec() }).unwrap();
    let missing = engine.execute(Command::Find { key: b"b".to_vec() }).unwrap();

    assert_eq!(insert, Response::Empty);
    assert_eq!(delete, Response::Empty);
    assert_eq!(found, Response::Values(vec![5]));
    assert_eq!(missing, Response::Null);
}

// =============================================================================
// In-Memory Engine Tests
// =============================================================================

#[test]
fn test_in_memory_engine() {
    let mut engine = Engine::in_memory().unwrap();

    engine.insert(b"a", 2).unwrap();
    engine.insert(b"a", 1).unwrap();
    engine.remove(b"a", 2).unwrap();

    assert_eq!(engine.find(b"a"), vec![1]);
}

#[test]
fn test_in_memory_restart() {
    let mut engine = Engine::in_memory().unwrap();
    engine.insert(b"a", 5).unwrap();
    engine.insert(b"a", 3).unwrap();
    engine.insert(b"b", 8).unwrap();
    engine.remove(b"b", 8).unwrap();

    let storage = engine.into_storage().unwrap();
    let engine = Engine::with_storage(storage, Config::default()).unwrap();

    assert_eq!(engine.find(b"a"), vec![3, 5]);
    assert!(engine.find(b"b").is_empty());
    assert_eq!(engine.recovery().tombstoned_records, 1);
}
