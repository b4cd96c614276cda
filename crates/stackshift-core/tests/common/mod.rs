#![allow(dead_code)]

use std::fs;

use stackshift_core::{BatchSessionRegistry, PathValidator, StateStore, StateStoreBuilder};
use tempfile::TempDir;

/// Helper function to create a state store in a fresh temp dir
pub fn create_test_store() -> (TempDir, StateStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = StateStoreBuilder::new(temp_dir.path())
        .build()
        .expect("Failed to create store");
    (temp_dir, store)
}

/// Helper function to lay out a batch root with one directory per repo.
/// The registry is authorized for the batch root only.
pub fn create_batch_root(repos: &[&str]) -> (TempDir, BatchSessionRegistry) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for repo in repos {
        fs::create_dir_all(temp_dir.path().join(repo)).expect("Failed to create repo dir");
    }
    let registry = BatchSessionRegistry::new(PathValidator::new(temp_dir.path()));
    (temp_dir, registry)
}
