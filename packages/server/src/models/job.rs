use common::{Job, JobStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for submitting a job.
///
/// `text` is kept as raw JSON so that a missing value and a non-string value
/// can be reported separately.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SubmitJobRequest {
    /// Text to transform; 1-10000 characters after trimming.
    #[schema(value_type = String, example = "hello world")]
    pub text: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: Uuid,
    #[schema(example = "queued")]
    pub status: JobStatus,
}

impl From<Job> for SubmitJobResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
        }
    }
}
