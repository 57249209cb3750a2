//! Book models for the Bookshelf Gateway platform
//!
//! The catalog schema is intentionally flat: everything the similarity
//! index consumes is a plain string field, and fields the index does not
//! use (`year`, `image_url`) are carried as opaque passthroughs.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One recommendable catalog entry.
///
/// All fields are owned strings. Identifiers are coerced to strings at
/// load time even when the source column is numeric, so callers can never
/// miss a lookup over an id-type mismatch. Missing text fields are stored
/// as `""`, never as a missing-value marker; empty strings are safe to
/// concatenate into the similarity text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Book {
    /// Stable unique identifier (ISBN in the stock catalog)
    #[validate(length(min = 1))]
    pub id: String,

    /// Title; primary matching key for lookups by name. May be empty and
    /// is not unique across the catalog.
    pub title: String,

    /// Author name, empty when unknown
    pub author: String,

    /// Publisher name, empty when unknown
    pub publisher: String,

    /// Publication year, opaque passthrough (not used by similarity)
    pub year: String,

    /// Cover image URL, opaque passthrough (not used by similarity)
    pub image_url: String,
}

impl Book {
    /// Text blob the similarity index is built over.
    ///
    /// Computed once at index-build time; not part of the serialized
    /// attribute set returned to callers.
    pub fn combined_text(&self) -> String {
        format!("{} {} {}", self.title, self.author, self.publisher)
    }
}
