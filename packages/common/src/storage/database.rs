use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::error::StorageError;
use super::traits::{JobStore, WebhookEvent, WebhookEventStore};
use crate::JobStatus;
use crate::entity::{job, webhook_event};
use crate::job::{Job, JobOutcome};

/// Job store over the `job` table.
///
/// Status changes are single conditional `UPDATE`s filtered on the statuses the
/// target may be reached from, so two concurrent writers cannot move a job
/// backwards.
#[derive(Clone)]
pub struct DatabaseJobStore {
    db: DatabaseConnection,
}

impl DatabaseJobStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn transition(
        &self,
        id: Uuid,
        target: JobStatus,
        update: job::ActiveModel,
    ) -> Result<Job, StorageError> {
        let result = job::Entity::update_many()
            .set(update)
            .filter(job::Column::Id.eq(id))
            .filter(job::Column::Status.is_in(JobStatus::sources_for(target)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match self.get(id).await? {
                None => Err(StorageError::NotFound(id)),
                Some(current) => {
                    debug!(
                        job_id = %id,
                        from = %current.status,
                        to = %target,
                        "Conditional update matched no row"
                    );
                    Err(StorageError::InvalidTransition {
                        id,
                        from: current.status,
                        to: target,
                    })
                }
            };
        }

        self.get(id).await?.ok_or(StorageError::NotFound(id))
    }
}

#[async_trait]
impl JobStore for DatabaseJobStore {
    async fn insert(&self, input: String) -> Result<Job, StorageError> {
        let job = Job::new(input, Utc::now());
        let model = job::ActiveModel {
            id: Set(job.id),
            text_input: Set(job.input),
            status: Set(job.status),
            result: Set(None),
            error_message: Set(None),
            created_at: Set(job.created_at),
            updated_at: Set(job.updated_at),
            processed_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        Ok(model.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StorageError> {
        let model = job::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Job::from))
    }

    async fn mark_processing(&self, id: Uuid) -> Result<Job, StorageError> {
        let update = job::ActiveModel {
            status: Set(JobStatus::Processing),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        self.transition(id, JobStatus::Processing, update).await
    }

    async fn finish(&self, id: Uuid, outcome: JobOutcome) -> Result<Job, StorageError> {
        let now = Utc::now();
        let target = outcome.status();
        let (result, error_message) = match outcome {
            JobOutcome::Completed(result) => (Some(result), None),
            JobOutcome::Failed(message) => (None, Some(message)),
        };
        let update = job::ActiveModel {
            status: Set(target),
            result: Set(result),
            error_message: Set(error_message),
            processed_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        self.transition(id, target, update).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = job::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_stale(
        &self,
        status: JobStatus,
        older_than: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, StorageError> {
        let ids: Vec<Uuid> = job::Entity::find()
            .select_only()
            .column(job::Column::Id)
            .filter(job::Column::Status.eq(status))
            .filter(job::Column::UpdatedAt.lt(older_than))
            .order_by_asc(job::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}

#[derive(Clone)]
pub struct DatabaseWebhookEventStore {
    db: DatabaseConnection,
}

impl DatabaseWebhookEventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WebhookEventStore for DatabaseWebhookEventStore {
    async fn save(
        &self,
        job_id: Uuid,
        event_type: String,
        payload: serde_json::Value,
    ) -> Result<WebhookEvent, StorageError> {
        let model = webhook_event::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(job_id),
            event_type: Set(event_type),
            payload: Set(payload),
            received_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(model.into())
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<WebhookEvent>, StorageError> {
        let events = webhook_event::Entity::find()
            .filter(webhook_event::Column::JobId.eq(job_id))
            .order_by_asc(webhook_event::Column::ReceivedAt)
            .all(&self.db)
            .await?;
        Ok(events.into_iter().map(WebhookEvent::from).collect())
    }
}
