//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CONFERENCE` prefix and
//! nested values are separated with double underscores.
//!
//! # Example
//!
//! ```no_run
//! use conference_sessions::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Data lives in {}", config.storage.data_dir.display());
//! ```

mod error;
mod logging;
mod notification;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use notification::NotificationConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// File-store location and write retry budget
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound e-mail sender and delivery budget
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CONFERENCE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CONFERENCE__STORAGE__DATA_DIR=/var/lib/conf` -> `storage.data_dir`
    /// - `CONFERENCE__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONFERENCE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.notification.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
