use common::Job;
use common::storage::{JobStore, StorageError};
use mq::{JobQueue, MqError};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SubmissionConfig;

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Rejected input; the message is shown to the caller.
    #[error("{0}")]
    Invalid(String),

    #[error("failed to insert job: {0}")]
    Storage(#[from] StorageError),

    /// The job row exists but no message references it. It stays `queued`
    /// until the stale-job reporter flags it.
    #[error("job {job_id} was stored but could not be enqueued: {source}")]
    Enqueue {
        job_id: Uuid,
        #[source]
        source: MqError,
    },
}

/// Validate raw submitted text and return it trimmed.
///
/// Checks run in order: present, textual, non-empty after trimming, within
/// `max_length` characters. A blank string counts as missing.
pub fn validate_text(text: Option<&Value>, max_length: usize) -> Result<String, SubmissionError> {
    let text = match text {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(other) => Some(other),
    }
    .ok_or_else(|| SubmissionError::Invalid("Text is required".into()))?;

    let Value::String(text) = text else {
        return Err(SubmissionError::Invalid("Text must be a string".into()));
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SubmissionError::Invalid("Text cannot be empty".into()));
    }

    if trimmed.chars().count() > max_length {
        return Err(SubmissionError::Invalid(format!(
            "Text exceeds maximum length of {max_length} characters"
        )));
    }

    Ok(trimmed.to_string())
}

/// Validates text, stores a `queued` job and enqueues a reference to it.
pub struct SubmissionService<'a> {
    jobs: &'a dyn JobStore,
    queue: &'a JobQueue,
    config: &'a SubmissionConfig,
}

impl<'a> SubmissionService<'a> {
    pub fn new(jobs: &'a dyn JobStore, queue: &'a JobQueue, config: &'a SubmissionConfig) -> Self {
        Self {
            jobs,
            queue,
            config,
        }
    }

    /// The row is inserted strictly before the message is sent, so a worker
    /// never sees a reference to a job that does not exist yet.
    pub async fn submit(&self, text: Option<&Value>) -> Result<Job, SubmissionError> {
        let text = validate_text(text, self.config.max_length)?;
        let length = text.chars().count();

        let job = self.jobs.insert(text).await?;

        match self.queue.enqueue(job.id).await {
            Ok(msg_id) => {
                info!(job_id = %job.id, msg_id, length, "Job submitted");
                Ok(job)
            }
            Err(source) => {
                warn!(job_id = %job.id, error = %source, "Enqueue failed after insert");
                Err(SubmissionError::Enqueue {
                    job_id: job.id,
                    source,
                })
            }
        }
    }
}
