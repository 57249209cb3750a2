//! Error types for the Bookshelf Gateway platform

use thiserror::Error;

/// Platform-wide error type shared across Bookshelf Gateway crates.
///
/// The recommendation core deliberately keeps this surface small: query
/// misses and empty catalogs are *not* errors (they are empty results), so
/// the only fallible paths are configuration loading and the one-time
/// catalog read at startup.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    /// The catalog data source could not be read
    #[error("Catalog source error: {message}")]
    CatalogSource { message: String },
}

impl GatewayError {
    /// Shorthand for a configuration error tied to a specific env key.
    pub fn config<S: Into<String>>(message: S, key: &str) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::CatalogSource {
            message: err.to_string(),
        }
    }
}
