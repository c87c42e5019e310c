//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default, so an absent file yields a working
//! development configuration.

pub mod app;
pub mod auth;
pub mod logging;
pub mod reservation;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::reservation::ReservationConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Reservation state, catalog, and expiry settings.
    #[serde(default)]
    pub reservations: ReservationConfig,
    /// Identity header settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config_path`, an optional `config/{env}` overlay, and
    /// environment variables prefixed with `RESHUB__` (e.g.
    /// `RESHUB__SERVER__PORT=9000`).
    pub fn load(config_path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("RESHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.reservations.state_file.trim().is_empty() {
            return Err(AppError::configuration(
                "reservations.state_file must not be empty",
            ));
        }
        if self.reservations.catalog_file.trim().is_empty() {
            return Err(AppError::configuration(
                "reservations.catalog_file must not be empty",
            ));
        }
        if self.auth.identity_header.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.identity_header must not be empty",
            ));
        }
        self.reservations.resolve_timezone()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.identity_header, "x-remote-user");
        assert!(config.reservations.require_known_resource);
    }

    #[test]
    fn test_validate_rejects_bad_timezone() {
        let mut config = AppConfig::default();
        config.reservations.timezone = "Mars/Olympus".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_rejects_empty_header() {
        let mut config = AppConfig::default();
        config.auth.identity_header = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist", "nowhere").unwrap();
        assert_eq!(config.reservations.state_file, "data/reservations.json");
    }
}
