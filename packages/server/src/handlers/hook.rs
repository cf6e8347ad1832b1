use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::models::hook::{WebhookAck, WebhookPayload};
use crate::services::notification::NotificationRelay;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Receive a job row-change notification.
#[utoipa::path(
    post,
    path = "/job-status",
    tag = "Hooks",
    operation_id = "receiveJobStatus",
    summary = "Job status webhook",
    description = "Accepts database webhook notifications for the jobs table. When a secret is configured it must be sent in `x-webhook-signature`; it is checked before the body is read. Any non-empty JSON body is acknowledged.",
    request_body = WebhookPayload,
    params(("x-webhook-signature" = Option<String>, Header, description = "Shared webhook secret")),
    responses(
        (status = 200, description = "Notification acknowledged", body = WebhookAck),
        (status = 400, description = "Missing or malformed payload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Signature mismatch (UNAUTHORIZED)", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn receive_job_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let relay = NotificationRelay::new(state.events.as_ref(), &state.config.webhook);

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    if !relay.authorize(signature) {
        warn!("Invalid webhook signature received");
        return Err(AppError::Unauthorized);
    }

    let body: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| AppError::Validation("Request body is not valid JSON".into()))?
    };
    let payload = WebhookPayload::from_body(body)
        .ok_or_else(|| AppError::Validation("Missing webhook payload".into()))?;
    relay.receive(&payload).await;

    Ok(Json(WebhookAck { success: true }))
}
