use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MqError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Visibility timeout out of range: {0:?}")]
    InvalidVisibilityTimeout(Duration),

    #[error("{0}")]
    Internal(String),
}
