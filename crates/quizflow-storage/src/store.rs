//! Result and progress persistence on top of a storage backend.
//!
//! Results are an append-log per user; progress is one checkpoint per
//! user/questionnaire pair. The store owns the key scheme and envelope
//! metadata; the backend just holds JSON documents.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quizflow_core::error::StorageError;
use quizflow_core::results::{CompletedResult, RunProgress};
use quizflow_core::traits::ResultSink;

use crate::backend::StorageBackend;

/// Stored result envelope: the completed result plus storage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredResult {
    #[serde(flatten)]
    result: CompletedResult,
    saved_at: DateTime<Utc>,
}

/// Aggregate history numbers for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub total_runs: usize,
    pub average_score: i64,
    pub last_completed: Option<DateTime<Utc>>,
}

/// The persistence collaborator consumed by the run engine.
pub struct ResultStore {
    backend: Arc<dyn StorageBackend>,
}

impl ResultStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    fn results_key(user_id: &str) -> String {
        format!("results-{user_id}")
    }

    fn progress_key(user_id: &str, questionnaire_id: &str) -> String {
        format!("progress-{user_id}-{questionnaire_id}")
    }

    async fn load_entries(&self, user_id: &str) -> Result<Vec<StoredResult>, StorageError> {
        let Some(value) = self.backend.get(&Self::results_key(user_id)).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_value(value) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // A corrupt history should not block new saves; start fresh.
                tracing::warn!(user_id, error = %e, "stored results unreadable, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    /// Aggregate stats over the user's saved results.
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats, StorageError> {
        let results = self.load_results(user_id, None).await?;
        if results.is_empty() {
            return Ok(UserStats {
                total_runs: 0,
                average_score: 0,
                last_completed: None,
            });
        }
        let total: i64 = results.iter().map(|r| r.score).sum();
        Ok(UserStats {
            total_runs: results.len(),
            average_score: (total as f64 / results.len() as f64).round() as i64,
            last_completed: results.first().map(|r| r.completed_at),
        })
    }
}

#[async_trait]
impl ResultSink for ResultStore {
    async fn save_result(
        &self,
        user_id: &str,
        result: &CompletedResult,
    ) -> Result<(), StorageError> {
        let mut entries = self.load_entries(user_id).await?;
        entries.push(StoredResult {
            result: result.clone(),
            saved_at: Utc::now(),
        });
        let value = serde_json::to_value(&entries)?;
        self.backend.put(&Self::results_key(user_id), value).await
    }

    async fn load_results(
        &self,
        user_id: &str,
        questionnaire_id: Option<&str>,
    ) -> Result<Vec<CompletedResult>, StorageError> {
        let mut results: Vec<CompletedResult> = self
            .load_entries(user_id)
            .await?
            .into_iter()
            .map(|entry| entry.result)
            .filter(|result| {
                questionnaire_id
                    .map(|id| result.questionnaire_id == id)
                    .unwrap_or(true)
            })
            .collect();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results)
    }

    async fn save_progress(
        &self,
        user_id: &str,
        questionnaire_id: &str,
        progress: &RunProgress,
    ) -> Result<(), StorageError> {
        let value = serde_json::to_value(progress)?;
        self.backend
            .put(&Self::progress_key(user_id, questionnaire_id), value)
            .await
    }

    async fn load_progress(
        &self,
        user_id: &str,
        questionnaire_id: &str,
    ) -> Result<Option<RunProgress>, StorageError> {
        let Some(value) = self
            .backend
            .get(&Self::progress_key(user_id, questionnaire_id))
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn clear_progress(
        &self,
        user_id: &str,
        questionnaire_id: &str,
    ) -> Result<(), StorageError> {
        self.backend
            .remove(&Self::progress_key(user_id, questionnaire_id))
            .await
    }
}
