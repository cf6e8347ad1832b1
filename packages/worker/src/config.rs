use std::time::Duration;

use common::config::{DatabaseConfig, ENV_PREFIX, MqAppConfig, config_path};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Worker-specific configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    /// Unique identifier for this worker instance. Default: "worker-1".
    #[serde(default = "default_worker_id")]
    pub id: String,
    /// Pause between polls once the queue is drained. Default: 1000.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Run a worker loop inside the server process. Only read by the server. Default: false.
    #[serde(default)]
    pub embedded: bool,
}

fn default_worker_id() -> String {
    "worker-1".into()
}
fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            id: default_worker_id(),
            poll_interval_ms: default_poll_interval_ms(),
            embedded: false,
        }
    }
}

impl WorkerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Worker application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerAppConfig {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl WorkerAppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("worker.id", "worker-1")?
            .set_default("worker.poll_interval_ms", 1000_i64)?
            .set_default("mq.queue_name", "text_jobs")?
            .set_default("mq.visibility_timeout_secs", 300_i64)?
            .add_source(File::with_name(&config_path()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
