use std::time::Duration;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Store-side knobs that are not connection parameters. The connection
/// itself (host, port, db) comes from the STORE_* environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// TTL in hours attached to cache writes.
    pub ttl_hours: u64,
    /// What to do when the store answers the startup probe negatively.
    pub on_degraded: DegradedAction,
    /// Probe attempts when `on_degraded = "retry"`.
    pub probe_attempts: u32,
    /// Seconds between probe attempts when `on_degraded = "retry"`.
    pub probe_backoff_secs: u64,
}

/// Reaction to a store that accepts connections but fails the liveness
/// probe. The half-initialized client this would otherwise leave behind is
/// never an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DegradedAction {
    /// Treat a failed probe like an unreachable store (fatal).
    #[default]
    Fail,
    /// Re-probe with a fixed backoff before giving up.
    Retry,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            on_degraded: DegradedAction::default(),
            probe_attempts: 3,
            probe_backoff_secs: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl StoreConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 3600)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
