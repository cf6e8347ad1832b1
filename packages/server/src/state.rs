use std::sync::Arc;

use anyhow::Context;
use common::config::Backend;
use common::database::init_db;
use common::storage::database::{DatabaseJobStore, DatabaseWebhookEventStore};
use common::storage::memory::{MemoryJobStore, MemoryWebhookEventStore};
use common::storage::{JobStore, WebhookEventStore};
use mq::{JobQueue, MemoryQueue, PgQueue, Queue};
use worker::{Uppercase, Worker};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jobs: Arc<dyn JobStore>,
    pub events: Arc<dyn WebhookEventStore>,
    pub queue: JobQueue,
    /// Shares `jobs` and `queue`; used by the trigger endpoint and the embedded loop.
    pub worker: Worker,
}

impl AppState {
    /// Wire up the configured backend, connecting and syncing tables for Postgres.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        match config.database.backend {
            Backend::Memory => Ok(Self::in_memory(config)),
            Backend::Postgres => {
                let db = init_db(&config.database)
                    .await
                    .context("Failed to initialize database")?;
                PgQueue::sync_schema(&db)
                    .await
                    .context("Failed to initialize MQ")?;

                Ok(Self::with_backends(
                    config,
                    Arc::new(DatabaseJobStore::new(db.clone())),
                    Arc::new(DatabaseWebhookEventStore::new(db.clone())),
                    Arc::new(PgQueue::new(db)),
                ))
            }
        }
    }

    /// Process-local stores and queue.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(MemoryJobStore::new()),
            Arc::new(MemoryWebhookEventStore::new()),
            Arc::new(MemoryQueue::new()),
        )
    }

    pub fn with_backends(
        config: AppConfig,
        jobs: Arc<dyn JobStore>,
        events: Arc<dyn WebhookEventStore>,
        queue: Arc<dyn Queue>,
    ) -> Self {
        let queue = JobQueue::new(queue, &config.mq.queue_name);
        let worker = Worker::new(
            jobs.clone(),
            queue.clone(),
            Arc::new(Uppercase),
            config.mq.visibility_timeout(),
        );

        Self {
            config: Arc::new(config),
            jobs,
            events,
            queue,
            worker,
        }
    }
}
