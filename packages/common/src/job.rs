use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::JobStatus;

/// One unit of submitted text awaiting or undergoing transformation.
///
/// Invariant: `result` is set iff `status == completed`, `error_message` is set
/// iff `status == error`, and `processed_at` is set iff the status is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Job {
    pub id: Uuid,
    /// Submitted text, already trimmed.
    #[serde(rename = "text_input")]
    pub input: String,
    pub status: JobStatus,
    pub result: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Terminal decision a worker reached about a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed(String),
    Failed(String),
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            Self::Completed(_) => JobStatus::Completed,
            Self::Failed(_) => JobStatus::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move job from {from} to {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

impl Job {
    /// A freshly submitted job in `queued` state.
    pub fn new(input: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            input,
            status: JobStatus::Queued,
            result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            processed_at: None,
        }
    }

    fn check(&self, to: JobStatus) -> Result<(), TransitionError> {
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError {
                from: self.status,
                to,
            })
        }
    }

    pub fn start_processing(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.check(JobStatus::Processing)?;
        self.status = JobStatus::Processing;
        self.updated_at = now;
        Ok(())
    }

    pub fn finish(&mut self, outcome: JobOutcome, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.check(outcome.status())?;
        self.status = outcome.status();
        match outcome {
            JobOutcome::Completed(result) => {
                self.result = Some(result);
                self.error_message = None;
            }
            JobOutcome::Failed(message) => {
                self.result = None;
                self.error_message = Some(message);
            }
        }
        self.processed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}
