//! Node configuration
//!
//! Defaults plus environment overrides. A variable that fails to parse is
//! reported back as a [`ConfigError`] and the default is kept, so a typo
//! never stops the node from starting.

use std::time::Duration;
use thiserror::Error;

use bigspace_namespace::{NamespaceConfig, NamespaceError, SimulationConfig, WritePolicy};

use crate::telemetry::TelemetryConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    #[error("worker_threads must be at least 1")]
    NoWorkers,
}

/// Runtime (process) configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Tokio worker threads
    pub worker_threads: usize,
    /// Number of leading items the logging observer subscribes to
    pub watch_items: usize,
    /// How often the metrics snapshot is logged
    pub metrics_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 10,
            watch_items: 0,
            metrics_interval: Duration::from_secs(10),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub namespace: NamespaceConfig,
    pub simulation: SimulationConfig,
    pub runtime: RuntimeConfig,
    pub telemetry: TelemetryConfig,
}

impl NodeConfig {
    /// Load from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `BIGSPACE_ITEMS`: number of items (default: 1000)
    /// - `BIGSPACE_TICK_MS`: tick interval in milliseconds (default: 1000, 0 disables the driver)
    /// - `BIGSPACE_WORKERS`: tokio worker threads (default: 10)
    /// - `BIGSPACE_WRITABLE`: delegate attribute writes to the item store (default: false)
    /// - `BIGSPACE_WATCH`: items the logging observer subscribes to (default: 0)
    /// - `BIGSPACE_METRICS_SECS`: metrics log interval in seconds (default: 10)
    /// - `BIGSPACE_LOG_LEVEL` or `RUST_LOG`, `BIGSPACE_JSON_LOGS`: see [`TelemetryConfig`]
    pub fn from_env() -> (Self, Vec<ConfigError>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`, returning the config and every rejected variable.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NodeConfig {
            telemetry: TelemetryConfig::from_lookup(&lookup),
            ..Default::default()
        };
        let mut issues = Vec::new();

        if let Some(count) = parse::<usize, _>(&lookup, "BIGSPACE_ITEMS", &mut issues) {
            config.namespace.item_count = count;
        }

        if let Some(ms) = parse::<u64, _>(&lookup, "BIGSPACE_TICK_MS", &mut issues) {
            if ms == 0 {
                config.simulation.enabled = false;
            } else {
                config.simulation.interval = Duration::from_millis(ms);
            }
        }

        if let Some(workers) = parse::<usize, _>(&lookup, "BIGSPACE_WORKERS", &mut issues) {
            if workers == 0 {
                issues.push(ConfigError::InvalidValue {
                    key: "BIGSPACE_WORKERS",
                    value: workers.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            } else {
                config.runtime.worker_threads = workers;
            }
        }

        if let Some(writable) = parse_flag(&lookup, "BIGSPACE_WRITABLE", &mut issues) {
            config.namespace.write_policy = if writable {
                WritePolicy::Delegate
            } else {
                WritePolicy::ReadOnly
            };
        }

        if let Some(watch) = parse::<usize, _>(&lookup, "BIGSPACE_WATCH", &mut issues) {
            config.runtime.watch_items = watch;
        }

        if let Some(secs) = parse::<u64, _>(&lookup, "BIGSPACE_METRICS_SECS", &mut issues) {
            config.runtime.metrics_interval = Duration::from_secs(secs.max(1));
        }

        (config, issues)
    }

    /// Check the combined configuration before starting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.namespace.validate()?;
        if self.runtime.worker_threads == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, issues: &mut Vec<ConfigError>) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let parsed = raw.trim().parse::<T>();
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            issues.push(ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value: raw,
            });
            None
        }
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str, issues: &mut Vec<ConfigError>) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            issues.push(ConfigError::InvalidValue {
                key,
                value: raw,
                reason: "expected true or false".to_string(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> (NodeConfig, Vec<ConfigError>) {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key: &str| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let (config, issues) = load(&[]);
        assert!(issues.is_empty());
        assert_eq!(config.namespace.item_count, 1000);
        assert_eq!(config.runtime.worker_threads, 10);
        assert_eq!(config.simulation.interval, Duration::from_secs(1));
        assert!(config.simulation.enabled);
        assert_eq!(config.namespace.write_policy, WritePolicy::ReadOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let (config, issues) = load(&[
            ("BIGSPACE_ITEMS", "50"),
            ("BIGSPACE_TICK_MS", "250"),
            ("BIGSPACE_WORKERS", "2"),
            ("BIGSPACE_WRITABLE", "yes"),
            ("BIGSPACE_WATCH", "3"),
            ("BIGSPACE_LOG_LEVEL", "debug"),
        ]);
        assert!(issues.is_empty());
        assert_eq!(config.namespace.item_count, 50);
        assert_eq!(config.simulation.interval, Duration::from_millis(250));
        assert_eq!(config.runtime.worker_threads, 2);
        assert_eq!(config.namespace.write_policy, WritePolicy::Delegate);
        assert_eq!(config.runtime.watch_items, 3);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_zero_tick_disables_simulation() {
        let (config, _) = load(&[("BIGSPACE_TICK_MS", "0")]);
        assert!(!config.simulation.enabled);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let (config, issues) = load(&[
            ("BIGSPACE_ITEMS", "lots"),
            ("BIGSPACE_WORKERS", "0"),
            ("BIGSPACE_WRITABLE", "maybe"),
        ]);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|e| matches!(e, ConfigError::InvalidValue { .. })));
        assert_eq!(config.namespace.item_count, 1000);
        assert_eq!(config.runtime.worker_threads, 10);
        assert_eq!(config.namespace.write_policy, WritePolicy::ReadOnly);
    }

    #[test]
    fn test_validate_rejects_oversized_namespace() {
        let (config, issues) = load(&[("BIGSPACE_ITEMS", "2000000")]);
        assert!(issues.is_empty());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Namespace(NamespaceError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_issue_display_names_variable() {
        let (_, issues) = load(&[("BIGSPACE_TICK_MS", "-5")]);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("BIGSPACE_TICK_MS"));
    }
}
