//! # Bookshelf Core
//!
//! Core data structures and types for the Bookshelf Gateway platform.
//!
//! This crate provides the shared building blocks consumed by the
//! recommendation engine: domain models, configuration loading, error
//! handling, and vector math helpers.
//!
//! ## Modules
//!
//! - `models`: Domain models for catalog items and ratings
//! - `error`: Error types and handling
//! - `config`: Configuration loading and validation
//! - `math`: Mathematical utilities for vector operations

pub mod config;
pub mod error;
pub mod math;
pub mod models;

// Re-export commonly used types
pub use config::{load_dotenv, CatalogConfig, ConfigLoader, ServiceConfig};
pub use error::GatewayError;
pub use math::{cosine_similarity, dot_product, l2_norm, sparse_dot};
pub use models::{Book, RatingRecord};

/// Result type alias for Bookshelf Gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
