use std::sync::Arc;

use anyhow::Context;
use common::config::Backend;
use common::database::init_db;
use common::storage::database::DatabaseJobStore;
use mq::{JobQueue, PgQueue};
use tracing::{error, info};
use worker::{Uppercase, Worker, WorkerAppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = WorkerAppConfig::load().context("Failed to load config")?;
    info!("Worker starting: {}", config.worker.id);

    if config.database.backend == Backend::Memory {
        anyhow::bail!(
            "the memory backend is process-local; set worker.embedded on the server instead"
        );
    }

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    PgQueue::sync_schema(&db)
        .await
        .context("Failed to initialize MQ")?;

    let queue = JobQueue::new(Arc::new(PgQueue::new(db.clone())), &config.mq.queue_name);
    info!(
        queue_name = %config.mq.queue_name,
        visibility_timeout_secs = config.mq.visibility_timeout_secs,
        poll_interval_ms = config.worker.poll_interval_ms,
        "MQ connected"
    );

    let worker = Worker::new(
        Arc::new(DatabaseJobStore::new(db)),
        queue,
        Arc::new(Uppercase),
        config.mq.visibility_timeout(),
    );

    worker
        .run_loop(config.worker.poll_interval(), shutdown_signal())
        .await;

    info!("Worker stopped: {}", config.worker.id);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
