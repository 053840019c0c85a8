//! Environment configuration for the policy service.

use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "MEDIERP_BIND_ADDR";
pub const DECISION_CACHE_VAR: &str = "MEDIERP_DECISION_CACHE";
pub const DECISION_CACHE_CAPACITY_VAR: &str = "MEDIERP_DECISION_CACHE_CAPACITY";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DECISION_CACHE_CAPACITY: usize = 4096;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: '{value}' is not a socket address")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var}: '{value}' is not a boolean (expected true/false/1/0)")]
    InvalidFlag { var: &'static str, value: String },

    #[error("{var}: '{value}' is not a positive integer")]
    InvalidCapacity { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Memoize route decisions per (actor, path).
    pub decision_cache: bool,
    /// Entry count at which the cache is flushed.
    pub decision_cache_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            decision_cache: true,
            decision_cache_capacity: DEFAULT_DECISION_CACHE_CAPACITY,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = read(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: bind_addr.clone(),
            })?;

        let decision_cache = match read(DECISION_CACHE_VAR) {
            None => true,
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                var: DECISION_CACHE_VAR,
                value,
            })?,
        };

        let decision_cache_capacity = match read(DECISION_CACHE_CAPACITY_VAR) {
            None => DEFAULT_DECISION_CACHE_CAPACITY,
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidCapacity {
                        var: DECISION_CACHE_CAPACITY_VAR,
                        value,
                    });
                }
            },
        };

        Ok(Self {
            bind_addr,
            decision_cache,
            decision_cache_capacity,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| vars.get(k).cloned()
    }

    #[test]
    fn unset_environment_yields_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, " 127.0.0.1:9000 "),
            (DECISION_CACHE_VAR, "off"),
            (DECISION_CACHE_CAPACITY_VAR, "16"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert!(!config.decision_cache);
        assert_eq!(config.decision_cache_capacity, 16);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[(DECISION_CACHE_VAR, "  ")])).unwrap();
        assert!(config.decision_cache);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[(DECISION_CACHE_VAR, "maybe")])),
            Err(ConfigError::InvalidFlag { .. })
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[(DECISION_CACHE_CAPACITY_VAR, "0")])),
            Err(ConfigError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[(DECISION_CACHE_CAPACITY_VAR, "-3")])),
            Err(ConfigError::InvalidCapacity { .. })
        ));
    }
}
