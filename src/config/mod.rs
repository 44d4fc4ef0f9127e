//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `OUTLAY_` prefix and nested values use double underscores as
//! separators (e.g. `OUTLAY_DATABASE__URL`).
//!
//! # Example
//!
//! ```no_run
//! use outlay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod cache;
mod database;
mod error;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Cache configuration (Redis or in-memory)
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Loads configuration from `.env` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("OUTLAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validates every configuration section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}

/// Initializes the tracing subscriber from `RUST_LOG`, defaulting to
/// `info`. Call once at process startup.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_fails_without_database_url() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_with_database_url_validates() {
        let config = AppConfig {
            database: DatabaseConfig {
                url: "postgres://localhost/outlay".to_string(),
                ..Default::default()
            },
            cache: CacheConfig::default(),
        };
        assert!(config.validate().is_ok());
    }
}
