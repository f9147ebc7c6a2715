//! The storage backend contract.

use async_trait::async_trait;
use serde_json::Value;

use quizflow_core::error::StorageError;

/// A keyed JSON document store.
///
/// Adapters persist whole values per key; append semantics and key schemes
/// live above this trait, in the store layer.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Adapter name used in error messages and fallback logs.
    fn name(&self) -> &str;

    /// Write the value for a key, replacing any previous value.
    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Read the value for a key, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Delete the value for a key. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
