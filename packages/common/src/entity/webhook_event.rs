use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit copy of a database-change notification received for a job.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "webhook_event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Not a foreign key: notifications may outlive the job row.
    #[sea_orm(indexed)]
    pub job_id: Uuid,

    pub event_type: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Json,

    pub received_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::storage::WebhookEvent {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            event_type: model.event_type,
            payload: model.payload,
            received_at: model.received_at,
        }
    }
}
