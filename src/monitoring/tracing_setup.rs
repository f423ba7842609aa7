use crate::error::ConfigError;
use anyhow::Result;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration for Lander
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub log_level: String,
    pub enable_json_logs: bool,
}

impl TracingConfig {
    pub fn new(log_level: &str, enable_json_logs: bool) -> Self {
        Self {
            log_level: log_level.to_string(),
            enable_json_logs,
        }
    }

    /// Install the global subscriber. `RUST_LOG` takes precedence over the configured level.
    pub fn init_tracing(&self) -> Result<()> {
        let level = normalize_level(&self.log_level)?;
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let console_layer = fmt::layer().with_target(true);

        if self.enable_json_logs {
            Registry::default()
                .with(env_filter)
                .with(console_layer.json().flatten_event(true))
                .try_init()?;
        } else {
            Registry::default()
                .with(env_filter)
                .with(console_layer.compact())
                .try_init()?;
        }

        Ok(())
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_json_logs: false,
        }
    }
}

/// Map a `LANDER_LOGLEVEL` value onto a tracing level name.
///
/// `panic` and `fatal` have no tracing counterpart and become `error`.
pub fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" | "panic" | "fatal" => Ok("error"),
        _ => Err(ConfigError::InvalidLogLevel {
            level: level.to_string(),
        }),
    }
}
