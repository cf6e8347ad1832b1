use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Queue payload referencing a job.
///
/// Only the identifier travels through the queue; the worker always reads the
/// job itself from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub job_id: Uuid,
}

impl JobRef {
    pub fn new(job_id: Uuid) -> Self {
        Self { job_id }
    }
}
