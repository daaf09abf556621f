//! Application configuration loaded from environment variables.

use std::env;

use scribe_infra::{Argon2Config, JwtConfig};

#[cfg(feature = "postgres")]
use scribe_infra::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use scribe_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Only enable behind a proxy that overwrites `X-Forwarded-For`.
    pub trust_forwarded_headers: bool,
    pub jwt: JwtConfig,
    pub argon2: Argon2Config,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            trust_forwarded_headers: lookup("TRUST_FORWARDED_HEADERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            jwt: JwtConfig::from_lookup(&lookup),
            argon2: Argon2Config::from_lookup(&lookup),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_lookup(&lookup),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_lookup(&lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.trust_forwarded_headers);
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.argon2, Argon2Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(|key| match key {
            "HOST" => Some("0.0.0.0".to_string()),
            "PORT" => Some("9000".to_string()),
            "JWT_ISSUER" => Some("blog".to_string()),
            "TRUST_FORWARDED_HEADERS" => Some("true".to_string()),
            _ => None,
        });

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert!(config.trust_forwarded_headers);
        assert_eq!(config.jwt.issuer, "blog");
    }

    #[test]
    fn test_unparsable_port_falls_back() {
        let config = AppConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));

        assert_eq!(config.port, 8080);
    }
}
