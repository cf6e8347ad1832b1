use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::MqError;
use crate::models::{Queue, QueueMessage, visibility_deadline};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    queues: HashMap<String, BTreeMap<i64, QueueMessage>>,
}

/// Process-local queue with the same visibility semantics as the Postgres queue.
///
/// The single lock makes every read atomic, so a visible message is claimed by
/// exactly one caller.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    state: Mutex<State>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages still present in `queue`, visible or not.
    pub async fn len(&self, queue: &str) -> usize {
        self.state
            .lock()
            .await
            .queues
            .get(queue)
            .map_or(0, BTreeMap::len)
    }

    /// Snapshot of a message without claiming it.
    pub async fn peek(&self, queue: &str, msg_id: i64) -> Option<QueueMessage> {
        self.state
            .lock()
            .await
            .queues
            .get(queue)
            .and_then(|q| q.get(&msg_id).cloned())
    }
}

#[async_trait]
impl Queue for MemoryQueue {
    async fn send(&self, queue: &str, message: &serde_json::Value) -> Result<i64, MqError> {
        let now = Utc::now();
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let msg_id = state.next_id;
        state.queues.entry(queue.to_string()).or_default().insert(
            msg_id,
            QueueMessage {
                msg_id,
                read_ct: 0,
                enqueued_at: now,
                vt: now,
                message: message.clone(),
            },
        );
        Ok(msg_id)
    }

    async fn read(
        &self,
        queue: &str,
        visibility_timeout: Duration,
        limit: usize,
    ) -> Result<Vec<QueueMessage>, MqError> {
        let now = Utc::now();
        let deadline = visibility_deadline(now, visibility_timeout)?;

        let mut state = self.state.lock().await;
        let Some(messages) = state.queues.get_mut(queue) else {
            return Ok(vec![]);
        };

        let claimed: Vec<QueueMessage> = messages
            .values_mut()
            .filter(|m| m.vt <= now)
            .take(limit)
            .map(|m| {
                m.read_ct += 1;
                m.vt = deadline;
                m.clone()
            })
            .collect();
        Ok(claimed)
    }

    async fn delete(&self, queue: &str, msg_id: i64) -> Result<bool, MqError> {
        let mut state = self.state.lock().await;
        Ok(state
            .queues
            .get_mut(queue)
            .is_some_and(|q| q.remove(&msg_id).is_some()))
    }
}
