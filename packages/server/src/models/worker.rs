use common::JobStatus;
use serde::Serialize;
use uuid::Uuid;
use worker::WorkerOutcome;

/// Result of one worker invocation.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRunResponse {
    #[schema(example = "Job processed successfully")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 42)]
    pub msg_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl From<WorkerOutcome> for WorkerRunResponse {
    fn from(outcome: WorkerOutcome) -> Self {
        match outcome {
            WorkerOutcome::Idle => Self {
                message: "No messages in queue".into(),
                job_id: None,
                msg_id: None,
                status: None,
            },
            WorkerOutcome::Processed {
                job_id,
                msg_id,
                status,
            } => Self {
                message: "Job processed successfully".into(),
                job_id: Some(job_id),
                msg_id: Some(msg_id),
                status: Some(status),
            },
        }
    }
}
