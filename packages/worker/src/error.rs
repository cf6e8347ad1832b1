use common::JobStatus;
use common::storage::StorageError;
use mq::MqError;
use thiserror::Error;
use uuid::Uuid;

/// Why a single worker invocation did not process a job.
///
/// The worker acknowledges a message once it has reached a decision about the
/// referenced job, successful or not. Only failures before the job is resolved
/// leave the message in the queue for redelivery; see [`WorkerError::acknowledged`].
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Not acknowledged: nothing was claimed, or the claim will expire.
    #[error("Failed to read from queue: {0}")]
    QueueRead(#[source] MqError),

    /// Not acknowledged: the message reappears after its visibility timeout.
    #[error("Failed to look up job {job_id}: {source}")]
    JobLookup {
        job_id: Uuid,
        #[source]
        source: StorageError,
    },

    /// Acknowledged: the payload does not carry a job reference.
    #[error("Message {msg_id} has an invalid payload: {reason}")]
    MalformedMessage { msg_id: i64, reason: String },

    /// Acknowledged: the referenced job does not exist.
    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: Uuid, msg_id: i64 },

    /// Acknowledged: the job already reached `completed` or `error`.
    #[error("Job {job_id} is already {status}")]
    AlreadyTerminal { job_id: Uuid, status: JobStatus },

    /// Acknowledged: the job could not be moved to `processing`.
    #[error("Failed to update job {job_id} status: {source}")]
    StatusUpdate {
        job_id: Uuid,
        #[source]
        source: StorageError,
    },

    /// Acknowledged: the job outcome could not be written back.
    #[error("Failed to save result for job {job_id}: {source}")]
    SaveResult {
        job_id: Uuid,
        #[source]
        source: StorageError,
    },
}

impl WorkerError {
    /// Whether the message was deleted from the queue before this error was returned.
    pub fn acknowledged(&self) -> bool {
        !matches!(self, Self::QueueRead(_) | Self::JobLookup { .. })
    }

    /// The job this error concerns, if it was known.
    pub fn job_id(&self) -> Option<Uuid> {
        match self {
            Self::QueueRead(_) | Self::MalformedMessage { .. } => None,
            Self::JobLookup { job_id, .. }
            | Self::JobNotFound { job_id, .. }
            | Self::AlreadyTerminal { job_id, .. }
            | Self::StatusUpdate { job_id, .. }
            | Self::SaveResult { job_id, .. } => Some(*job_id),
        }
    }
}

/// Failure reported by a [`crate::Transform`]; stored as the job's error message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransformError(pub String);

pub type Result<T> = std::result::Result<T, WorkerError>;
