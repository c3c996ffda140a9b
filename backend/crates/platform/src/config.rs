//! Environment Configuration Helpers
//!
//! `.env` is loaded by the binary with `dotenvy`; these helpers read typed
//! values out of the process environment.

use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(String),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: String, value: String },
}

/// Non-empty value of `name`, or `None`.
pub fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_required(name: &str) -> Result<String, ConfigError> {
    env_opt(name).ok_or_else(|| ConfigError::Missing(name.to_string()))
}

pub fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Parse `name` as `T`, falling back to `default` when unset.
pub fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env_opt(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value,
        }),
    }
}

/// Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn env_flag(name: &str, default: bool) -> Result<bool, ConfigError> {
    match env_opt(name) {
        None => Ok(default),
        Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
            name: name.to_string(),
            value,
        }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
