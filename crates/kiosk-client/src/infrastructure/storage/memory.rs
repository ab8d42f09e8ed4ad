//! In-memory settings store for tests.
//!
//! Behaves like [`TomlConfigStore`](super::TomlConfigStore) minus the file:
//! writes are visible immediately and `sync` only counts how often it was
//! called, so tests can assert that a batch of writes was flushed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::application::ports::{ConfigError, ConfigStore};

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: Mutex<BTreeMap<String, String>>,
    syncs: AtomicUsize,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `sync` calls so far.
    pub fn sync_count(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn keys_in_group(&self, group: &str) -> Vec<String> {
        let prefix = format!("{group}/");
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn sync(&self) -> Result<(), ConfigError> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
