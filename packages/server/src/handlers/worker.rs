use axum::{Json, extract::State};
use tracing::{instrument, warn};
use worker::WorkerError;

use crate::error::{AppError, ErrorBody};
use crate::models::worker::WorkerRunResponse;
use crate::state::AppState;

/// Run the worker once against the job queue.
#[utoipa::path(
    post,
    path = "/run",
    tag = "Worker",
    operation_id = "runWorker",
    summary = "Process one queued job",
    description = "Reads at most one message, processes the referenced job and acknowledges the message.",
    responses(
        (status = 200, description = "Queue empty or job processed", body = WorkerRunResponse),
        (status = 404, description = "Message referenced a missing job (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Queue, store or status update failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn run_worker(State(state): State<AppState>) -> Result<Json<WorkerRunResponse>, AppError> {
    match state.worker.run_once().await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(WorkerError::JobNotFound { job_id, msg_id }) => {
            warn!(job_id = %job_id, msg_id, "Worker dropped message for missing job");
            Err(AppError::NotFound("Job not found".into()))
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}
