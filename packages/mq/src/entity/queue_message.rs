use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A message in one of the named queues.
///
/// Visible to readers once `vt <= now()`. Reading pushes `vt` forward and bumps `read_ct`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "queue_message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub msg_id: i64,

    #[sea_orm(indexed)]
    pub queue_name: String,

    pub read_ct: i32,

    pub enqueued_at: DateTimeUtc,

    /// Visibility deadline.
    #[sea_orm(indexed)]
    pub vt: DateTimeUtc,

    #[sea_orm(column_type = "JsonBinary")]
    pub message: Json,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::QueueMessage {
    fn from(model: Model) -> Self {
        Self {
            msg_id: model.msg_id,
            read_ct: model.read_ct,
            enqueued_at: model.enqueued_at,
            vt: model.vt,
            message: model.message,
        }
    }
}
