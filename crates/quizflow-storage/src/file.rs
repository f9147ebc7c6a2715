//! JSON-file storage backend: one file per key under a root directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use quizflow_core::error::StorageError;

use crate::backend::StorageBackend;

/// Persists each key as `<root>/<key>.json`.
pub struct JsonFileBackend {
    root: PathBuf,
}

impl JsonFileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys may carry user-provided ids; keep filenames tame.
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{sanitized}.json"))
    }

    fn backend_error(&self, err: std::io::Error) -> StorageError {
        StorageError::Backend {
            backend: "json-file".into(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| self.backend_error(e))?;
        let bytes = serde_json::to_vec_pretty(&value)?;
        tokio::fs::write(self.path_for(key), bytes)
            .await
            .map_err(|e| self.backend_error(e))
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.backend_error(e)),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.backend_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn roundtrip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());

        backend.put("results-u1", json!([1, 2, 3])).await.unwrap();
        assert!(dir.path().join("results-u1.json").exists());
        assert_eq!(
            backend.get("results-u1").await.unwrap(),
            Some(json!([1, 2, 3]))
        );

        backend.remove("results-u1").await.unwrap();
        assert_eq!(backend.get("results-u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn absent_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        assert_eq!(backend.get("nothing").await.unwrap(), None);
        backend.remove("nothing").await.unwrap();
    }

    #[tokio::test]
    async fn keys_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());

        backend.put("progress-u/../x", json!(1)).await.unwrap();
        assert!(dir.path().join("progress-u____x.json").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json").unwrap();
        let backend = JsonFileBackend::new(dir.path());

        let err = backend.get("bad").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
