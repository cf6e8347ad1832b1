use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::JobRef;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::MqError;
use crate::models::{Queue, QueueMessage};

/// One claimed message from the job queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub message_id: i64,
    pub read_count: i32,
    pub enqueued_at: DateTime<Utc>,
    pub visibility_deadline: DateTime<Utc>,
    /// Raw payload; may not be a valid [`JobRef`] if something else wrote to the queue.
    pub payload: serde_json::Value,
}

impl Delivery {
    pub fn job_ref(&self) -> Result<JobRef, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

impl From<QueueMessage> for Delivery {
    fn from(message: QueueMessage) -> Self {
        Self {
            message_id: message.msg_id,
            read_count: message.read_ct,
            enqueued_at: message.enqueued_at,
            visibility_deadline: message.vt,
            payload: message.message,
        }
    }
}

/// Typed view of a named queue carrying [`JobRef`] payloads.
#[derive(Clone)]
pub struct JobQueue {
    inner: Arc<dyn Queue>,
    name: String,
}

impl JobQueue {
    pub fn new(inner: Arc<dyn Queue>, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a reference to `job_id` and return the message id.
    pub async fn enqueue(&self, job_id: Uuid) -> Result<i64, MqError> {
        let payload = serde_json::to_value(JobRef::new(job_id))?;
        let msg_id = self.inner.send(&self.name, &payload).await?;
        debug!(queue = %self.name, msg_id, job_id = %job_id, "Job enqueued");
        Ok(msg_id)
    }

    /// Claim at most one message, hiding it for `visibility_timeout`.
    pub async fn read(&self, visibility_timeout: Duration) -> Result<Option<Delivery>, MqError> {
        let mut messages = self.inner.read(&self.name, visibility_timeout, 1).await?;
        Ok(messages.pop().map(Delivery::from))
    }

    /// Delete the delivered message.
    ///
    /// Acknowledging a message that is already gone is a no-op and returns `Ok(false)`.
    pub async fn ack(&self, delivery: &Delivery) -> Result<bool, MqError> {
        let deleted = self.inner.delete(&self.name, delivery.message_id).await?;
        if !deleted {
            warn!(
                queue = %self.name,
                msg_id = delivery.message_id,
                "Message was already deleted"
            );
        }
        Ok(deleted)
    }
}
