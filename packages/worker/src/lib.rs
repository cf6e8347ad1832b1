pub mod config;
pub mod error;
pub mod runner;
pub mod transform;

pub use config::{WorkerAppConfig, WorkerConfig};
pub use error::{Result, TransformError, WorkerError};
pub use runner::{Worker, WorkerOutcome};
pub use transform::{Transform, Uppercase};
