//! Shared configuration loader module for Bookshelf Gateway services
//!
//! Provides a unified configuration loading system with environment
//! variable parsing, validation, and `.env` file support. All configuration
//! uses the `BOOKSHELF_` prefix for environment variables, with un-prefixed
//! fallbacks for the common keys (`PORT`, `RUST_LOG`).
//!
//! Override hierarchy: defaults < .env < environment.

use crate::error::GatewayError;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration loader trait
///
/// Standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables, filling defaults for
    /// missing optional values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a set variable cannot be parsed.
    fn from_env() -> Result<Self, GatewayError>;

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), GatewayError>;
}

/// Catalog data source configuration
///
/// # Environment Variables
///
/// - `BOOKSHELF_CATALOG_PATH` (optional): path to the catalog CSV
///   (default: "data/Books.csv")
/// - `BOOKSHELF_CATALOG_ROW_CAP` (optional): maximum rows loaded from the
///   source (default: 5000). Bounds index build cost; not a correctness
///   knob.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Path to the catalog CSV file
    pub path: PathBuf,
    /// Maximum number of rows loaded from the source
    pub row_cap: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/Books.csv"),
            row_cap: 5000,
        }
    }
}

impl ConfigLoader for CatalogConfig {
    fn from_env() -> Result<Self, GatewayError> {
        let path = std::env::var("BOOKSHELF_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| CatalogConfig::default().path);

        let row_cap = parse_env_var(
            "BOOKSHELF_CATALOG_ROW_CAP",
            CatalogConfig::default().row_cap,
        )?;

        Ok(Self { path, row_cap })
    }

    fn validate(&self) -> Result<(), GatewayError> {
        if self.path.as_os_str().is_empty() {
            return Err(GatewayError::config(
                "catalog path must not be empty",
                "BOOKSHELF_CATALOG_PATH",
            ));
        }

        if self.row_cap == 0 {
            return Err(GatewayError::config(
                "row_cap must be greater than 0",
                "BOOKSHELF_CATALOG_ROW_CAP",
            ));
        }

        Ok(())
    }
}

/// Service configuration
///
/// # Environment Variables
///
/// - `BOOKSHELF_SERVICE_HOST` (optional): bind host (default: "0.0.0.0")
/// - `BOOKSHELF_SERVICE_PORT` (optional): bind port (default: 8090),
///   falls back to `PORT`
/// - `BOOKSHELF_SERVICE_WORKERS` (optional): worker threads
///   (default: CPU count)
/// - `BOOKSHELF_SERVICE_LOG_LEVEL` (optional): log level (default: "info"),
///   falls back to `RUST_LOG`
/// - `BOOKSHELF_SERVICE_REQUEST_TIMEOUT` (optional): request timeout in
///   seconds (default: 60)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service bind host
    pub host: String,
    /// Service bind port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Request timeout duration
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            workers: num_cpus::get(),
            log_level: "info".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, GatewayError> {
        let host = std::env::var("BOOKSHELF_SERVICE_HOST")
            .unwrap_or_else(|_| ServiceConfig::default().host);

        let port = parse_env_var("BOOKSHELF_SERVICE_PORT", ServiceConfig::default().port)
            .or_else(|_| parse_env_var("PORT", ServiceConfig::default().port))?;

        let workers = parse_env_var(
            "BOOKSHELF_SERVICE_WORKERS",
            ServiceConfig::default().workers,
        )?;

        let log_level = std::env::var("BOOKSHELF_SERVICE_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| ServiceConfig::default().log_level);

        let request_timeout_secs = parse_env_var("BOOKSHELF_SERVICE_REQUEST_TIMEOUT", 60u64)?;

        Ok(Self {
            host,
            port,
            workers,
            log_level,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    fn validate(&self) -> Result<(), GatewayError> {
        if self.port == 0 {
            return Err(GatewayError::config(
                "port must be greater than 0",
                "BOOKSHELF_SERVICE_PORT",
            ));
        }

        if self.workers == 0 {
            return Err(GatewayError::config(
                "workers must be greater than 0",
                "BOOKSHELF_SERVICE_WORKERS",
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(GatewayError::config(
                format!(
                    "Invalid log_level '{}'. Must be one of: {}",
                    self.log_level,
                    valid_log_levels.join(", ")
                ),
                "BOOKSHELF_SERVICE_LOG_LEVEL",
            ));
        }

        if self.request_timeout.as_secs() == 0 {
            return Err(GatewayError::config(
                "request_timeout must be greater than 0 seconds",
                "BOOKSHELF_SERVICE_REQUEST_TIMEOUT",
            ));
        }

        Ok(())
    }
}

/// Parse an environment variable with a default value.
///
/// # Errors
///
/// Returns a `ConfigurationError` if the variable is set but cannot be
/// parsed as `T`.
fn parse_env_var<T>(key: &str, default: T) -> Result<T, GatewayError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| GatewayError::config(format!("Failed to parse {}: {}", key, e), key))
        })
        .unwrap_or(Ok(default))
}

/// Load a `.env` file if present.
///
/// Convenience wrapper around dotenvy that stays silent when no `.env`
/// exists.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    // Process environment is shared across the parallel test runner;
    // every test that touches it holds this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_test_env(key: &str, value: &str) {
        env::set_var(key, value);
    }

    fn clear_test_env(key: &str) {
        env::remove_var(key);
    }

    #[test]
    fn test_catalog_config_default() {
        let config = CatalogConfig::default();
        assert_eq!(config.path, PathBuf::from("data/Books.csv"));
        assert_eq!(config.row_cap, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_catalog_config_from_env() {
        let _guard = lock_env();
        set_test_env("BOOKSHELF_CATALOG_PATH", "/srv/catalog/books.csv");
        set_test_env("BOOKSHELF_CATALOG_ROW_CAP", "250");

        let config = CatalogConfig::from_env().unwrap();
        assert_eq!(config.path, PathBuf::from("/srv/catalog/books.csv"));
        assert_eq!(config.row_cap, 250);

        clear_test_env("BOOKSHELF_CATALOG_PATH");
        clear_test_env("BOOKSHELF_CATALOG_ROW_CAP");
    }

    #[test]
    fn test_catalog_config_unparseable_row_cap() {
        let _guard = lock_env();
        set_test_env("BOOKSHELF_CATALOG_ROW_CAP", "lots");
        let result = CatalogConfig::from_env();
        assert!(result.is_err());
        clear_test_env("BOOKSHELF_CATALOG_ROW_CAP");
    }

    #[test]
    fn test_catalog_config_validation_zero_row_cap() {
        let config = CatalogConfig {
            row_cap: 0,
            ..CatalogConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8090);
        assert_eq!(config.log_level, "info");
        assert!(config.workers > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_service_config_from_env() {
        let _guard = lock_env();
        set_test_env("BOOKSHELF_SERVICE_HOST", "127.0.0.1");
        set_test_env("BOOKSHELF_SERVICE_PORT", "3000");
        set_test_env("BOOKSHELF_SERVICE_WORKERS", "4");
        set_test_env("BOOKSHELF_SERVICE_LOG_LEVEL", "debug");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.workers, 4);
        assert_eq!(config.log_level, "debug");

        clear_test_env("BOOKSHELF_SERVICE_HOST");
        clear_test_env("BOOKSHELF_SERVICE_PORT");
        clear_test_env("BOOKSHELF_SERVICE_WORKERS");
        clear_test_env("BOOKSHELF_SERVICE_LOG_LEVEL");
    }

    #[test]
    fn test_service_config_validation_invalid_log_level() {
        let config = ServiceConfig {
            log_level: "loud".to_string(),
            ..ServiceConfig::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        match result.unwrap_err() {
            GatewayError::ConfigurationError { message, .. } => {
                assert!(message.contains("Invalid log_level"));
            }
            _ => panic!("Expected ConfigurationError"),
        }
    }

    #[test]
    fn test_service_config_validation_zero_port() {
        let config = ServiceConfig {
            port: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_var_with_default() {
        let result: u32 = parse_env_var("BOOKSHELF_NON_EXISTENT_VAR", 42).unwrap();
        assert_eq!(result, 42);
    }
}
