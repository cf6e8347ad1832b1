pub mod entity;
pub mod error;
pub mod job_queue;
pub mod memory;
pub mod models;
pub mod postgres;

pub use error::MqError;
pub use job_queue::{Delivery, JobQueue};
pub use memory::MemoryQueue;
pub use models::{Queue, QueueMessage};
pub use postgres::PgQueue;
