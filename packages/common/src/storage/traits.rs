use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;
use crate::job::{Job, JobOutcome};
use crate::JobStatus;

/// Durable record of job identity, input, status and result.
///
/// Every method is a single atomic step; no isolation across calls is assumed.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new `queued` job holding `input`.
    async fn insert(&self, input: String) -> Result<Job, StorageError>;

    /// Fetch the latest committed state of a job.
    async fn get(&self, id: Uuid) -> Result<Option<Job>, StorageError>;

    /// Move a job to `processing`, stamping `updated_at`.
    async fn mark_processing(&self, id: Uuid) -> Result<Job, StorageError>;

    /// Record the terminal outcome, stamping `processed_at` and `updated_at`.
    async fn finish(&self, id: Uuid, outcome: JobOutcome) -> Result<Job, StorageError>;

    /// Remove a job.
    ///
    /// Returns `true` if the job was deleted, `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Ids of jobs sitting in `status` since before `older_than`, oldest first.
    async fn find_stale(
        &self,
        status: JobStatus,
        older_than: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, StorageError>;
}

/// An externally delivered notification about a job row change, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: Uuid,
    pub job_id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[async_trait]
pub trait WebhookEventStore: Send + Sync {
    async fn save(
        &self,
        job_id: Uuid,
        event_type: String,
        payload: serde_json::Value,
    ) -> Result<WebhookEvent, StorageError>;

    /// Events recorded for a job, in arrival order.
    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<WebhookEvent>, StorageError>;
}
