use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use common::Job;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::job::{SubmitJobRequest, SubmitJobResponse};
use crate::services::status::StatusService;
use crate::services::submission::SubmissionService;
use crate::state::AppState;

/// Submit text for asynchronous processing.
#[utoipa::path(
    post,
    path = "/submit",
    tag = "Jobs",
    operation_id = "submitJob",
    summary = "Submit a text job",
    description = "Validates and trims the text, stores a `queued` job and enqueues it for a worker.",
    request_body = SubmitJobRequest,
    responses(
        (status = 201, description = "Job queued", body = SubmitJobResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Store or queue failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn submit_job(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitJobRequest>,
) -> Result<(StatusCode, Json<SubmitJobResponse>), AppError> {
    let service = SubmissionService::new(
        state.jobs.as_ref(),
        &state.queue,
        &state.config.submission,
    );
    let job = service.submit(payload.text.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(job.into())))
}

/// Look up a job by id.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Jobs",
    operation_id = "getJob",
    summary = "Get job status",
    description = "Returns the full job record, including the result once processing finished.",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job record", body = Job),
        (status = 400, description = "Malformed job id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Job not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let id: Uuid = id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Job ID must be a valid UUID".into()))?;

    let job = StatusService::new(state.jobs.as_ref()).get(id).await?;
    Ok(Json(job))
}

/// `GET /jobs` and `GET /jobs/` with no id segment.
pub async fn missing_job_id() -> AppError {
    AppError::Validation("Job ID is required".into())
}
