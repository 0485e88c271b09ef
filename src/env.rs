//! Environment variable names used by this crate for configuring delivery
//! from a service's environment.
//!
//! These are purely helpers; the sink types themselves never read the
//! environment.

use crate::dispatch::DispatchConfig;
use std::str::FromStr;
use tokio::time::Duration;

/// Backend DSN, e.g. `clickhouse://127.0.0.1:8123/default/logs` or `stdout://`.
pub const LOG_SINK_DSN_ENV: &str = "LOG_SINK_DSN";

/// Optional logical service name stamped on every stored record.
pub const LOG_SINK_SERVICE_NAME_ENV: &str = "LOG_SINK_SERVICE_NAME";

/// Capacity of the queue between callers and the delivery task.
pub const LOG_SINK_CHANNEL_BUFFER_ENV: &str = "LOG_SINK_CHANNEL_BUFFER";

/// Records per backend batch.
pub const LOG_SINK_BATCH_SIZE_ENV: &str = "LOG_SINK_BATCH_SIZE";

/// Flush interval for partial batches, in milliseconds.
pub const LOG_SINK_FLUSH_INTERVAL_MS_ENV: &str = "LOG_SINK_FLUSH_INTERVAL_MS";

/// Retries per failing record before its batch is given up.
pub const LOG_SINK_MAX_RETRIES_ENV: &str = "LOG_SINK_MAX_RETRIES";

/// DSN used when [`LOG_SINK_DSN_ENV`] is unset.
pub const DEFAULT_DSN: &str = "stdout://";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Error returned when an environment variable holds an unusable value.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: String, value: String },
}

impl DispatchConfig {
    /// Build a config from the `LOG_SINK_*` variables, keeping defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DispatchConfig::default();

        if let Some(n) = parse_var(&lookup, LOG_SINK_CHANNEL_BUFFER_ENV)? {
            config.channel_buffer = n;
        }
        if let Some(n) = parse_var(&lookup, LOG_SINK_BATCH_SIZE_ENV)? {
            config.batch_size = n;
        }
        if let Some(ms) = parse_var(&lookup, LOG_SINK_FLUSH_INTERVAL_MS_ENV)? {
            config.flush_interval = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var(&lookup, LOG_SINK_MAX_RETRIES_ENV)? {
            config.max_retries = n;
        }
        config.service_name = lookup(LOG_SINK_SERVICE_NAME_ENV)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(ConfigError::InvalidNumber {
                key: key.to_string(),
                value: raw,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DispatchConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.channel_buffer, 1024);
        assert_eq!(config.batch_size, 128);
        assert_eq!(config.service_name, None);
    }

    #[test]
    fn reads_all_variables() {
        let config = DispatchConfig::from_lookup(lookup(&[
            ("LOG_SINK_CHANNEL_BUFFER", "4096"),
            ("LOG_SINK_BATCH_SIZE", " 500 "),
            ("LOG_SINK_FLUSH_INTERVAL_MS", "250"),
            ("LOG_SINK_MAX_RETRIES", "2"),
            ("LOG_SINK_SERVICE_NAME", "booking-admin"),
        ]))
        .unwrap();

        assert_eq!(config.channel_buffer, 4096);
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.flush_interval, Duration::from_millis(250));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.service_name.as_deref(), Some("booking-admin"));
    }

    #[test]
    fn rejects_non_numeric() {
        let err = DispatchConfig::from_lookup(lookup(&[("LOG_SINK_BATCH_SIZE", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "LOG_SINK_BATCH_SIZE".to_string(),
                value: "lots".to_string(),
            }
        );
    }

    #[test]
    fn blank_service_name_is_none() {
        let config = DispatchConfig::from_lookup(lookup(&[("LOG_SINK_SERVICE_NAME", "  ")])).unwrap();
        assert_eq!(config.service_name, None);
    }
}
