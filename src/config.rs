//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::lock::DEFAULT_LOCK_TTL;

/// Layer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime of an operation lock before it is considered abandoned.
    pub lock_ttl_secs: u64,

    /// Environment (development, production)
    pub environment: String,

    /// Whether the audit trail starts enabled.
    pub audit_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_ttl_secs: DEFAULT_LOCK_TTL.as_secs(),
            environment: "development".to_string(),
            audit_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let lock_ttl_secs = match env::var("LOCK_TTL_SECONDS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LOCK_TTL_SECONDS"))?,
            Err(_) => defaults.lock_ttl_secs,
        };

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| defaults.environment.clone());

        let audit_enabled = match env::var("AUDIT_ENABLED") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("AUDIT_ENABLED"))?,
            Err(_) => defaults.audit_enabled,
        };

        Ok(Self {
            lock_ttl_secs,
            environment,
            audit_enabled,
        })
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lock_ttl_policy() {
        let config = Config::default();
        assert_eq!(config.lock_ttl(), Duration::from_secs(30));
        assert!(config.audit_enabled);
        assert!(!config.is_production());
    }
}
