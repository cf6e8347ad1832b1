mod error;
mod traits;

#[cfg(feature = "sea-orm")]
pub mod database;
pub mod memory;

pub use error::StorageError;
pub use traits::{JobStore, WebhookEvent, WebhookEventStore};
