//! Logging configuration and subscriber setup.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Read the logging variables through `lookup`.
    ///
    /// # Environment Variables
    ///
    /// - `BIGSPACE_LOG_LEVEL` or `RUST_LOG`: filter (default: info)
    /// - `BIGSPACE_JSON_LOGS`: JSON output (default: false)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            log_level: lookup("BIGSPACE_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: lookup("BIGSPACE_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),
        }
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    }

    tracing::debug!(
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TelemetryConfig::from_lookup(lookup(&[]));
        assert_eq!(config, TelemetryConfig::default());
    }

    #[test]
    fn test_own_variable_wins_over_rust_log() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("BIGSPACE_LOG_LEVEL", "debug"),
            ("RUST_LOG", "warn"),
        ]));
        assert_eq!(config.log_level, "debug");

        let config = TelemetryConfig::from_lookup(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_json_flag() {
        assert!(TelemetryConfig::from_lookup(lookup(&[("BIGSPACE_JSON_LOGS", "TRUE")])).json_logs);
        assert!(TelemetryConfig::from_lookup(lookup(&[("BIGSPACE_JSON_LOGS", "1")])).json_logs);
        assert!(!TelemetryConfig::from_lookup(lookup(&[("BIGSPACE_JSON_LOGS", "no")])).json_logs);
    }

    #[test]
    fn test_bad_filter_is_rejected() {
        let config = TelemetryConfig {
            log_level: "bigspace=notalevel".to_string(),
            json_logs: false,
        };
        assert!(matches!(
            init_logging(&config),
            Err(TelemetryError::Filter(_))
        ));
    }
}
