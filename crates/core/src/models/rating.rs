//! Rating models for the Bookshelf Gateway platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One explicit rating a user gave a catalog item.
///
/// The recommendation core consumes these as read-only input per request;
/// it never persists or mutates them. Entries that fail validation are
/// skipped individually by the blender, mirroring the loader's
/// skip-bad-rows policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RatingRecord {
    /// Opaque user identifier
    #[validate(length(min = 1))]
    pub user_id: String,

    /// Identifier of the rated item
    pub book_id: String,

    /// Title of the rated item at rating time. Dedup and seed lookup key
    /// on this, not on `book_id`.
    #[validate(length(min = 1))]
    pub book_title: String,

    /// Star rating, 1 (worst) to 5 (best)
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    /// Free-text review, may be empty
    #[serde(default)]
    pub review: String,

    /// When the rating was recorded
    pub timestamp: DateTime<Utc>,
}

impl RatingRecord {
    /// Whether this rating contributes a similarity seed ("liked").
    pub fn is_liked(&self) -> bool {
        self.rating >= 4
    }
}
