use std::sync::Arc;

use chrono::Utc;
use common::JobStatus;
use common::storage::{JobStore, StorageError};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::StaleJobsConfig;

/// Periodically log jobs that have sat in `queued` longer than the threshold.
///
/// Such a job was most likely inserted without its queue message being sent.
/// The reporter only logs; it never re-enqueues or mutates jobs.
pub async fn run_stale_job_reporter(jobs: Arc<dyn JobStore>, config: StaleJobsConfig) {
    info!(
        report_after_secs = config.report_after_secs,
        scan_interval_secs = config.scan_interval_secs,
        "Starting stale job reporter"
    );

    let mut interval = tokio::time::interval(config.scan_interval());

    loop {
        interval.tick().await;

        if let Err(e) = report_stale_jobs(jobs.as_ref(), &config).await {
            error!(error = %e, "Stale job scan failed");
        }
    }
}

/// One scan. Returns the ids that were reported.
pub async fn report_stale_jobs(
    jobs: &dyn JobStore,
    config: &StaleJobsConfig,
) -> Result<Vec<Uuid>, StorageError> {
    let threshold = chrono::Duration::from_std(config.report_after())
        .map_err(|e| StorageError::Internal(e.to_string()))?;
    let cutoff = Utc::now() - threshold;

    let stale = jobs.find_stale(JobStatus::Queued, cutoff).await?;
    for job_id in &stale {
        warn!(
            job_id = %job_id,
            report_after_secs = config.report_after_secs,
            "Job still queued; its queue message may never have been sent"
        );
    }

    Ok(stale)
}
