//! In-memory storage backend.
//!
//! The default test double, with failure injection and call counting so
//! fallback and retry paths can be exercised without real IO.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use quizflow_core::error::StorageError;

use crate::backend::StorageBackend;

/// A process-local backend over a `RwLock`ed map.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Value>>,
    fail_writes: AtomicBool,
    write_count: AtomicU32,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, for exercising fallback paths.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of write attempts made against this backend.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StorageError::Backend {
                backend: "memory".into(),
                message: "injected write failure".into(),
            });
        }
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}
