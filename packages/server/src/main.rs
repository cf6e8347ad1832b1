use anyhow::Context;
use common::config::Backend;
use server::config::AppConfig;
use server::services::stale::run_stale_job_reporter;
use server::state::AppState;
use tracing::{Level, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;
    let state = AppState::from_config(config.clone()).await?;

    info!(
        backend = ?config.database.backend,
        queue_name = %config.mq.queue_name,
        "Storage ready"
    );

    if config.stale_jobs.enabled {
        tokio::spawn(run_stale_job_reporter(
            state.jobs.clone(),
            config.stale_jobs.clone(),
        ));
    }

    if config.worker.embedded {
        let worker = state.worker.clone();
        let poll_interval = config.worker.poll_interval();
        info!(worker_id = %config.worker.id, "Starting embedded worker");
        tokio::spawn(async move {
            worker
                .run_loop(poll_interval, std::future::pending())
                .await;
        });
    } else if config.database.backend == Backend::Memory {
        warn!("Memory backend without embedded worker: jobs run only via POST /api/worker/run");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, server::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
