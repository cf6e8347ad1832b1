use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{Backend, DatabaseConfig, MqAppConfig};
pub use worker::WorkerConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    /// Preflight cache lifetime in seconds. Default: 86400.
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    86400
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
        }
    }
}

/// Submission limits.
#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    /// Maximum trimmed text length in characters. Default: 10000.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    10_000
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

/// Notification relay settings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WebhookConfig {
    /// Shared secret expected in `x-webhook-signature`. Unset or empty disables the check.
    #[serde(default)]
    pub secret: Option<String>,
    /// Persist received notifications as webhook events. Default: false.
    #[serde(default)]
    pub save_events: bool,
}

impl WebhookConfig {
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }
}

/// Periodic report of jobs that never left `queued`.
#[derive(Debug, Deserialize, Clone)]
pub struct StaleJobsConfig {
    /// Default: true.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// A queued job older than this is reported. Default: 600.
    #[serde(default = "default_report_after_secs")]
    pub report_after_secs: u64,
    /// Default: 60.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_report_after_secs() -> u64 {
    600
}
fn default_scan_interval_secs() -> u64 {
    60
}

impl Default for StaleJobsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            report_after_secs: default_report_after_secs(),
            scan_interval_secs: default_scan_interval_secs(),
        }
    }
}

impl StaleJobsConfig {
    pub fn report_after(&self) -> Duration {
        Duration::from_secs(self.report_after_secs)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub stale_jobs: StaleJobsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.backend", "postgres")?
            .set_default("mq.queue_name", "text_jobs")?
            .set_default("mq.visibility_timeout_secs", 300_i64)?
            .set_default("submission.max_length", 10_000_i64)?
            .set_default("webhook.save_events", false)?
            // Load from config/config.toml
            .add_source(File::with_name(&common::config::config_path()).required(false))
            // Override from environment (e.g., TEXTQ__WEBHOOK__SECRET)
            .add_source(Environment::with_prefix(common::config::ENV_PREFIX).separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would panic or spin at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stale_jobs.enabled && self.stale_jobs.scan_interval_secs == 0 {
            return Err(ConfigError::Message(
                "stale_jobs.scan_interval_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
