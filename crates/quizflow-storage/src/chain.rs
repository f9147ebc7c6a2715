//! Ordered fallback across storage backends.
//!
//! A Chain-of-Responsibility: writes try each backend in order and the
//! first success short-circuits; reads return the first backend that has a
//! value, so a fresher primary naturally shadows a legacy secondary.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use quizflow_core::error::StorageError;

use crate::backend::StorageBackend;

pub struct BackendChain {
    backends: Vec<Arc<dyn StorageBackend>>,
}

impl BackendChain {
    /// Build a chain from backends ordered most- to least-preferred.
    pub fn new(backends: Vec<Arc<dyn StorageBackend>>) -> Self {
        Self { backends }
    }
}

#[async_trait]
impl StorageBackend for BackendChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        for backend in &self.backends {
            match backend.put(key, value.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        backend = backend.name(),
                        error = %e,
                        "backend write failed, falling back"
                    );
                }
            }
        }
        Err(StorageError::Exhausted)
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        for backend in &self.backends {
            match backend.get(key).await {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        backend = backend.name(),
                        error = %e,
                        "backend read failed, falling back"
                    );
                }
            }
        }
        Ok(None)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        // Clear everywhere: a key left in a fallback backend would
        // resurface on the next read.
        let mut removed_any = false;
        for backend in &self.backends {
            match backend.remove(key).await {
                Ok(()) => removed_any = true,
                Err(e) => {
                    tracing::warn!(
                        backend = backend.name(),
                        error = %e,
                        "backend remove failed"
                    );
                }
            }
        }
        if removed_any {
            Ok(())
        } else {
            Err(StorageError::Exhausted)
        }
    }
}
