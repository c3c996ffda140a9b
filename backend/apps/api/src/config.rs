//! Server configuration from the environment.

use std::time::Duration;

use auth::AuthConfig;
use axum::http::HeaderValue;
use platform::config::{ConfigError, env_flag, env_opt, env_or, env_parse, env_required};
use platform::geocode::GeocoderConfig;
use platform::mail::MailConfig;

const DEFAULT_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub frontend_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env_required("DATABASE_URL")?,
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 5)?,
            port: env_parse("PORT", 31113)?,
            frontend_origins: parse_origins(&env_or("FRONTEND_ORIGINS", DEFAULT_ORIGINS)),
        })
    }
}

/// Comma separated origins; entries that are not valid header values are skipped.
pub fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect()
}

/// Signing secret is mandatory in release builds; debug builds fall back to
/// a random one.
pub fn auth_config() -> Result<AuthConfig, ConfigError> {
    let issuer = env_or("JWT_ISSUER", "karma");
    let mut config = match env_opt("JWT_SECRET") {
        Some(secret) => AuthConfig::with_secret(secret.as_bytes(), issuer),
        None if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random development secret");
            AuthConfig::development()
        }
        None => return Err(ConfigError::Missing("JWT_SECRET".into())),
    };

    let hours: u64 = env_parse("TOKEN_TTL_HOURS", 24)?;
    config.token_ttl = Duration::from_secs(hours * 3600);
    config.password_pepper = env_opt("PASSWORD_PEPPER").map(String::into_bytes);
    config.enforce_password_strength = !env_flag("SKIP_PASSWORD_CHECKS", false)?;
    Ok(config)
}

pub fn mail_config() -> MailConfig {
    let defaults = MailConfig::default();
    MailConfig {
        relay_url: env_opt("MAIL_RELAY_URL"),
        api_key: env_opt("MAIL_API_KEY"),
        from: env_opt("MAIL_FROM").unwrap_or(defaults.from),
        ..defaults
    }
}

pub fn geocoder_config() -> GeocoderConfig {
    GeocoderConfig {
        base_url: env_opt("GEOCODER_URL"),
        ..GeocoderConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blank_entries() {
        let origins = parse_origins("http://localhost:40922, ,https://karma.example\n");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://karma.example");
    }
}
