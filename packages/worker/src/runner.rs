use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use common::storage::JobStore;
use common::{JobOutcome, JobStatus};
use mq::{Delivery, JobQueue};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Result, WorkerError};
use crate::transform::Transform;

const PREVIEW_CHARS: usize = 50;

/// What a single [`Worker::run_once`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The queue had no visible message.
    Idle,
    /// A job reached a terminal status and its message was acknowledged.
    Processed {
        job_id: Uuid,
        msg_id: i64,
        status: JobStatus,
    },
}

/// Dequeues one job reference per invocation and drives the job to a terminal status.
///
/// Holds no state between invocations; any number of workers may share a queue.
#[derive(Clone)]
pub struct Worker {
    jobs: Arc<dyn JobStore>,
    queue: JobQueue,
    transform: Arc<dyn Transform>,
    visibility_timeout: Duration,
}

impl Worker {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        queue: JobQueue,
        transform: Arc<dyn Transform>,
        visibility_timeout: Duration,
    ) -> Self {
        Self {
            jobs,
            queue,
            transform,
            visibility_timeout,
        }
    }

    /// Process at most one message.
    ///
    /// After the job lookup succeeds the message is acknowledged whatever
    /// happens next, so a job gets at most one processing attempt.
    #[instrument(skip(self), fields(queue = %self.queue.name()))]
    pub async fn run_once(&self) -> Result<WorkerOutcome> {
        let Some(delivery) = self
            .queue
            .read(self.visibility_timeout)
            .await
            .map_err(WorkerError::QueueRead)?
        else {
            debug!("No messages in queue");
            return Ok(WorkerOutcome::Idle);
        };

        let msg_id = delivery.message_id;
        info!(msg_id, read_ct = delivery.read_count, "Message read");

        let job_id = match delivery.job_ref() {
            Ok(job_ref) => job_ref.job_id,
            Err(e) => {
                self.ack(&delivery).await;
                return Err(WorkerError::MalformedMessage {
                    msg_id,
                    reason: e.to_string(),
                });
            }
        };

        let job = match self.jobs.get(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                warn!(msg_id, job_id = %job_id, "Job not found, dropping message");
                self.ack(&delivery).await;
                return Err(WorkerError::JobNotFound { job_id, msg_id });
            }
            // Left unacknowledged; the visibility timeout will surface it again.
            Err(source) => return Err(WorkerError::JobLookup { job_id, source }),
        };

        info!(
            job_id = %job_id,
            status = %job.status,
            input = %preview(&job.input),
            "Job resolved"
        );

        if job.status.is_terminal() {
            self.ack(&delivery).await;
            return Err(WorkerError::AlreadyTerminal {
                job_id,
                status: job.status,
            });
        }

        if let Err(source) = self.jobs.mark_processing(job_id).await {
            self.ack(&delivery).await;
            return Err(WorkerError::StatusUpdate { job_id, source });
        }
        debug!(job_id = %job_id, "Job marked processing");

        let outcome = self.execute(&job.input);
        let status = outcome.status();
        match &outcome {
            JobOutcome::Completed(result) => {
                info!(job_id = %job_id, result = %preview(result), "Transformation completed")
            }
            JobOutcome::Failed(message) => {
                warn!(job_id = %job_id, error = %message, "Transformation failed")
            }
        }

        if let Err(source) = self.jobs.finish(job_id, outcome).await {
            self.ack(&delivery).await;
            return Err(WorkerError::SaveResult { job_id, source });
        }

        self.ack(&delivery).await;
        info!(job_id = %job_id, msg_id, status = %status, "Job processed");

        Ok(WorkerOutcome::Processed {
            job_id,
            msg_id,
            status,
        })
    }

    /// Poll until `shutdown` resolves.
    ///
    /// Messages are drained back to back; the loop only sleeps for
    /// `poll_interval` once the queue is empty or unreadable.
    pub async fn run_loop<F>(&self, poll_interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            loop {
                match self.run_once().await {
                    Ok(WorkerOutcome::Idle) => break,
                    Ok(WorkerOutcome::Processed { .. }) => {}
                    Err(e) if e.acknowledged() => {
                        warn!(error = %e, "Message dropped");
                    }
                    Err(e) => {
                        error!(error = %e, "Worker invocation failed");
                        break;
                    }
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, worker loop stopping");
                    return;
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
    }

    fn execute(&self, input: &str) -> JobOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.transform.apply(input))) {
            Ok(Ok(result)) => JobOutcome::Completed(result),
            Ok(Err(e)) => JobOutcome::Failed(e.to_string()),
            Err(payload) => JobOutcome::Failed(panic_message(payload.as_ref())),
        }
    }

    /// Delete the message. A failed delete is logged only: the job already has
    /// its outcome, and a redelivery is rejected as `AlreadyTerminal`.
    async fn ack(&self, delivery: &Delivery) {
        match self.queue.ack(delivery).await {
            Ok(_) => debug!(msg_id = delivery.message_id, "Message acknowledged"),
            Err(e) => error!(
                msg_id = delivery.message_id,
                error = %e,
                "Failed to acknowledge message"
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("Transformation panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("Transformation panicked: {s}")
    } else {
        "Transformation panicked".to_string()
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
