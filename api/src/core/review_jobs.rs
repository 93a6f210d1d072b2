//! In-memory registry of submitted review jobs.
//!
//! Jobs live for the lifetime of the process only; a restart loses them.
//! There is deliberately no durable queue behind this.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use review_engine::review::ReviewKind;

/// Lifecycle state of one submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

/// One submitted review and its current state.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewJob {
    pub review_id: String,
    pub project_id: String,
    pub merge_request_id: String,
    pub review_type: ReviewKind,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

/// Shared handle over the job map.
#[derive(Clone, Default)]
pub struct ReviewJobRegistry {
    inner: Arc<RwLock<HashMap<String, ReviewJob>>>,
}

impl ReviewJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new job as PROCESSING and returns its snapshot.
    pub async fn register(
        &self,
        review_id: String,
        project_id: String,
        merge_request_id: String,
        review_type: ReviewKind,
    ) -> ReviewJob {
        let job = ReviewJob {
            review_id: review_id.clone(),
            project_id,
            merge_request_id,
            review_type,
            status: JobStatus::Processing,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
            elapsed_ms: None,
        };
        self.inner.write().await.insert(review_id, job.clone());
        job
    }

    /// Marks a job COMPLETED with its review text.
    pub async fn complete(&self, review_id: &str, result: String, elapsed_ms: u64) {
        let mut jobs = self.inner.write().await;
        if let Some(job) = jobs.get_mut(review_id) {
            job.status = JobStatus::Completed;
            job.result = Some(result);
            job.completed_at = Some(Utc::now());
            job.elapsed_ms = Some(elapsed_ms);
        }
    }

    /// Marks a job FAILED with the error message.
    pub async fn fail(&self, review_id: &str, error: String, elapsed_ms: u64) {
        let mut jobs = self.inner.write().await;
        if let Some(job) = jobs.get_mut(review_id) {
            job.status = JobStatus::Failed;
            job.error = Some(error);
            job.completed_at = Some(Utc::now());
            job.elapsed_ms = Some(elapsed_ms);
        }
    }

    pub async fn get(&self, review_id: &str) -> Option<ReviewJob> {
        self.inner.read().await.get(review_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn jobs_move_through_their_lifecycle() {
        let registry = ReviewJobRegistry::new();
        registry
            .register("r-1".into(), "p".into(), "7".into(), ReviewKind::Basic)
            .await;

        let job = registry.get("r-1").await.unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.result.is_none());

        registry.complete("r-1", "looks good".into(), 42).await;
        let job = registry.get("r-1").await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result.as_deref(), Some("looks good"));
        assert_eq!(job.elapsed_ms, Some(42));

        assert!(registry.get("missing").await.is_none());
    }
}
