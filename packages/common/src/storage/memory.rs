//! Process-local stores backed by `tokio` locks.
//!
//! Used by tests and by single-process development setups where the worker
//! runs inside the server.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::error::StorageError;
use super::traits::{JobStore, WebhookEvent, WebhookEventStore};
use crate::JobStatus;
use crate::job::{Job, JobOutcome};

#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs currently stored.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, input: String) -> Result<Job, StorageError> {
        let job = Job::new(input, Utc::now());
        self.jobs.write().await.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StorageError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn mark_processing(&self, id: Uuid) -> Result<Job, StorageError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        job.start_processing(Utc::now())
            .map_err(|e| {
                debug!(job_id = %id, error = %e, "Rejected status change");
                StorageError::transition(id, e)
            })?;
        Ok(job.clone())
    }

    async fn finish(&self, id: Uuid, outcome: JobOutcome) -> Result<Job, StorageError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        job.finish(outcome, Utc::now())
            .map_err(|e| {
                debug!(job_id = %id, error = %e, "Rejected status change");
                StorageError::transition(id, e)
            })?;
        Ok(job.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        Ok(self.jobs.write().await.remove(&id).is_some())
    }

    async fn find_stale(
        &self,
        status: JobStatus,
        older_than: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, StorageError> {
        let jobs = self.jobs.read().await;
        let mut stale: Vec<&Job> = jobs
            .values()
            .filter(|j| j.status == status && j.updated_at < older_than)
            .collect();
        stale.sort_by_key(|j| j.created_at);
        Ok(stale.into_iter().map(|j| j.id).collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryWebhookEventStore {
    events: RwLock<Vec<WebhookEvent>>,
}

impl MemoryWebhookEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookEventStore for MemoryWebhookEventStore {
    async fn save(
        &self,
        job_id: Uuid,
        event_type: String,
        payload: serde_json::Value,
    ) -> Result<WebhookEvent, StorageError> {
        let event = WebhookEvent {
            id: Uuid::new_v4(),
            job_id,
            event_type,
            payload,
            received_at: Utc::now(),
        };
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<WebhookEvent>, StorageError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.job_id == job_id)
            .cloned()
            .collect())
    }
}
