pub mod config;
#[cfg(feature = "sea-orm")]
pub mod database;
#[cfg(feature = "sea-orm")]
pub mod entity;
pub mod job;
pub mod job_ref;
pub mod job_status;
pub mod storage;

pub use job::{Job, JobOutcome};
pub use job_ref::JobRef;
pub use job_status::JobStatus;
