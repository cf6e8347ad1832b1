use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::JobStatus;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub text_input: String,

    #[sea_orm(indexed)]
    pub status: JobStatus,

    /// Set only once the job is completed.
    #[sea_orm(column_type = "Text")]
    pub result: Option<String>,

    /// Set only once the job ended in error.
    #[sea_orm(column_type = "Text")]
    pub error_message: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub processed_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::job::Job {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            input: model.text_input,
            status: model.status,
            result: model.result,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
            processed_at: model.processed_at,
        }
    }
}
