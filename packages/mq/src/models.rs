use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MqError;

/// A message as handed out by [`Queue::read`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Queue-assigned sequence number, unique per send.
    pub msg_id: i64,
    /// How many times the message has been read, including this delivery.
    pub read_ct: i32,
    pub enqueued_at: DateTime<Utc>,
    /// Until this instant no other reader will see the message.
    pub vt: DateTime<Utc>,
    pub message: serde_json::Value,
}

/// At-least-once delivery channel with visibility-timeout redelivery.
///
/// A read message stays invisible for the requested timeout. If it is not
/// deleted before then it becomes readable again with a higher `read_ct`.
/// Implementations must hand a visible message to at most one concurrent reader.
#[async_trait]
pub trait Queue: Send + Sync {
    /// Append a message and return its id.
    async fn send(&self, queue: &str, message: &serde_json::Value) -> Result<i64, MqError>;

    /// Claim up to `limit` visible messages, oldest first.
    async fn read(
        &self,
        queue: &str,
        visibility_timeout: Duration,
        limit: usize,
    ) -> Result<Vec<QueueMessage>, MqError>;

    /// Delete a message.
    ///
    /// Returns `true` if the message was deleted, `false` if it was already gone.
    async fn delete(&self, queue: &str, msg_id: i64) -> Result<bool, MqError>;
}

/// Instant at which a message read at `now` becomes visible again.
pub(crate) fn visibility_deadline(
    now: DateTime<Utc>,
    visibility_timeout: Duration,
) -> Result<DateTime<Utc>, MqError> {
    chrono::Duration::from_std(visibility_timeout)
        .ok()
        .and_then(|vt| now.checked_add_signed(vt))
        .ok_or(MqError::InvalidVisibilityTimeout(visibility_timeout))
}
