//! Tests for credential persistence.

use tempfile::TempDir;

use tictactoe_client::{CredentialStore, FileCredentialStore, StoredCredentials};

fn setup_store() -> (TempDir, FileCredentialStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileCredentialStore::new(dir.path().join("nested").join("credentials.toml"));
    (dir, store)
}

#[test]
fn test_load_without_file_is_empty() {
    let (_dir, store) = setup_store();
    let loaded = store.load().expect("Load failed");
    assert_eq!(loaded, StoredCredentials::default());
}

#[test]
fn test_save_then_load_both_keys() {
    let (_dir, mut store) = setup_store();
    store
        .save(&StoredCredentials::new("a".to_string(), "T".to_string()))
        .expect("Save failed");

    let reopened = FileCredentialStore::new(store.path());
    let loaded = reopened.load().expect("Load failed");
    assert_eq!(loaded.username().as_deref(), Some("a"));
    assert_eq!(loaded.token().as_deref(), Some("T"));
}

#[test]
fn test_file_uses_token_and_username_keys() {
    let (_dir, mut store) = setup_store();
    store
        .save(&StoredCredentials::new("a".to_string(), "T".to_string()))
        .expect("Save failed");

    let content = std::fs::read_to_string(store.path()).expect("Read failed");
    assert!(content.contains("token = \"T\""));
    assert!(content.contains("username = \"a\""));
}

#[test]
fn test_clear_removes_file_and_is_idempotent() {
    let (_dir, mut store) = setup_store();
    store
        .save(&StoredCredentials::new("a".to_string(), "T".to_string()))
        .expect("Save failed");

    store.clear().expect("Clear failed");
    assert!(!store.path().exists());
    store.clear().expect("Second clear failed");
    assert_eq!(store.load().expect("Load failed"), StoredCredentials::default());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let (_dir, store) = setup_store();
    std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
    std::fs::write(store.path(), "token = [").expect("write");

    let err = store.load().expect_err("Should fail to parse");
    assert!(err.message.contains("Failed to parse credentials"));
}
