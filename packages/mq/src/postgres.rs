use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::entity::queue_message;
use crate::error::MqError;
use crate::models::{Queue, QueueMessage, visibility_deadline};

/// Queue stored in the `queue_message` table.
///
/// Reads lock candidate rows with `FOR UPDATE SKIP LOCKED`, so concurrent
/// readers each claim a disjoint set of messages.
#[derive(Clone)]
pub struct PgQueue {
    db: DatabaseConnection,
}

impl PgQueue {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `queue_message` table if it does not exist yet.
    pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
        db.get_schema_registry("mq::entity::*").sync(db).await
    }
}

#[async_trait]
impl Queue for PgQueue {
    async fn send(&self, queue: &str, message: &serde_json::Value) -> Result<i64, MqError> {
        let now = Utc::now();
        let model = queue_message::ActiveModel {
            msg_id: NotSet,
            queue_name: Set(queue.to_string()),
            read_ct: Set(0),
            enqueued_at: Set(now),
            vt: Set(now),
            message: Set(message.clone()),
        }
        .insert(&self.db)
        .await?;

        debug!(queue, msg_id = model.msg_id, "Message sent");
        Ok(model.msg_id)
    }

    async fn read(
        &self,
        queue: &str,
        visibility_timeout: Duration,
        limit: usize,
    ) -> Result<Vec<QueueMessage>, MqError> {
        let now = Utc::now();
        let deadline = visibility_deadline(now, visibility_timeout)?;

        let txn = self.db.begin().await?;

        let visible = queue_message::Entity::find()
            .filter(queue_message::Column::QueueName.eq(queue))
            .filter(queue_message::Column::Vt.lte(now))
            .order_by_asc(queue_message::Column::MsgId)
            .limit(Some(limit as u64))
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
            .all(&txn)
            .await?;

        let mut claimed = Vec::with_capacity(visible.len());
        for message in visible {
            let read_ct = message.read_ct + 1;
            let mut active: queue_message::ActiveModel = message.into();
            active.read_ct = Set(read_ct);
            active.vt = Set(deadline);
            claimed.push(QueueMessage::from(active.update(&txn).await?));
        }

        txn.commit().await?;
        Ok(claimed)
    }

    async fn delete(&self, queue: &str, msg_id: i64) -> Result<bool, MqError> {
        let result = queue_message::Entity::delete_many()
            .filter(queue_message::Column::QueueName.eq(queue))
            .filter(queue_message::Column::MsgId.eq(msg_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
