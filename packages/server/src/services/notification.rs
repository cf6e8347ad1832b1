use common::storage::WebhookEventStore;
use tracing::{error, info, warn};

use crate::config::WebhookConfig;
use crate::models::hook::WebhookPayload;

const DEFAULT_EVENT_TYPE: &str = "UPDATE";

/// Receives job row-change notifications and optionally keeps them for audit.
pub struct NotificationRelay<'a> {
    events: &'a dyn WebhookEventStore,
    config: &'a WebhookConfig,
}

impl<'a> NotificationRelay<'a> {
    pub fn new(events: &'a dyn WebhookEventStore, config: &'a WebhookConfig) -> Self {
        Self { events, config }
    }

    /// Compare the presented signature against the configured secret.
    ///
    /// With no secret configured every request is accepted.
    pub fn authorize(&self, signature: Option<&str>) -> bool {
        match self.config.secret() {
            None => true,
            Some(secret) => signature == Some(secret),
        }
    }

    /// Log the notification and, if enabled, persist it.
    ///
    /// Persistence failures are logged and swallowed; the sender is always
    /// acknowledged. Returns whether an event was stored.
    pub async fn receive(&self, payload: &WebhookPayload) -> bool {
        let job_id = payload.job_id();
        info!(
            event_type = payload.event_type().unwrap_or_default(),
            table = payload.table().unwrap_or_default(),
            job_id = ?job_id,
            status = payload.status().unwrap_or_default(),
            "Webhook received for job update"
        );

        if !self.config.save_events {
            return false;
        }
        let Some(job_id) = job_id else {
            warn!("Webhook record has no job id, not saving event");
            return false;
        };

        let event_type = payload.event_type().unwrap_or(DEFAULT_EVENT_TYPE).to_string();

        match self.events.save(job_id, event_type, payload.raw().clone()).await {
            Ok(event) => {
                info!(job_id = %job_id, event_id = %event.id, "Webhook event saved");
                true
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Failed to save webhook event");
                false
            }
        }
    }
}
