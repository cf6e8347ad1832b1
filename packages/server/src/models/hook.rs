use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Row-change notification, as sent by a database webhook.
///
/// Kept as the raw JSON body so every field the sender included (`created_at`,
/// `x-webhook-id`, ...) survives into the audit record. Known fields are read
/// leniently; a value of the wrong type reads as absent.
#[derive(Debug, Clone, PartialEq, utoipa::ToSchema)]
#[schema(value_type = Object)]
pub struct WebhookPayload(Value);

impl WebhookPayload {
    /// `None` for a body that counts as missing: `null`, `false`, `0` or `""`.
    pub fn from_body(body: Value) -> Option<Self> {
        let missing = match &body {
            Value::Null | Value::Bool(false) => true,
            Value::String(s) => s.is_empty(),
            Value::Number(n) => n.as_f64() == Some(0.0),
            _ => false,
        };
        (!missing).then_some(Self(body))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }

    fn record_field(&self, key: &str) -> Option<&str> {
        self.0.get("record")?.get(key)?.as_str()
    }

    /// Change kind, e.g. `UPDATE`.
    pub fn event_type(&self) -> Option<&str> {
        self.str_field("type").filter(|t| !t.is_empty())
    }

    pub fn table(&self) -> Option<&str> {
        self.str_field("table")
    }

    /// `record.id`, if present and a valid job id.
    pub fn job_id(&self) -> Option<Uuid> {
        self.record_field("id")?.parse().ok()
    }

    pub fn status(&self) -> Option<&str> {
        self.record_field("status")
    }

    /// The body exactly as received.
    pub fn raw(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WebhookAck {
    #[schema(example = true)]
    pub success: bool,
}
