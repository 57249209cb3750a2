//! Bookshelf Recommendation Engine
//!
//! Content-based recommendations for the Bookshelf Gateway platform: a
//! TF-IDF similarity index built once over the catalog, a popularity
//! fallback, and a request-time blender that turns a user's rating history
//! into a ranked, deduplicated suggestion list.
//!
//! The engine is built synchronously at startup and is immutable
//! afterwards; all query methods are pure and safe to call concurrently.
//! A future catalog refresh must construct a fresh engine and swap the
//! shared handle, never mutate one in place.

pub mod catalog;
pub mod recommendation;
pub mod similarity;
mod stopwords;

// Re-export key types
pub use catalog::{canonical_key, Catalog};
pub use similarity::SimilarityIndex;

use std::collections::HashSet;
use std::path::Path;

use bookshelf_core::models::{Book, RatingRecord};
use rand::Rng;
use tracing::info;

/// Recommendation engine configuration
#[derive(Debug, Clone)]
pub struct RecoConfig {
    /// Similar items fetched per title query (default: 5)
    pub similar_k: usize,
    /// Seed slots reserved for 5-star ratings (default: 7)
    pub max_five_star_seeds: usize,
    /// Total seed slots across both partitions (default: 10)
    pub max_seeds: usize,
    /// Similar items kept per 5-star seed (default: 5)
    pub five_star_keep: usize,
    /// Similar items kept per 4-star seed (default: 2)
    pub four_star_keep: usize,
    /// Backfill floor for a non-cold-start result (default: 5)
    pub min_results: usize,
    /// Result length when the caller does not specify one (default: 12)
    pub default_results: usize,
    /// Items returned on the cold-start path (default: 10)
    pub cold_start_count: usize,
}

impl Default for RecoConfig {
    fn default() -> Self {
        Self {
            similar_k: 5,
            max_five_star_seeds: 7,
            max_seeds: 10,
            five_star_keep: 5,
            four_star_keep: 2,
            min_results: 5,
            default_results: 12,
            cold_start_count: 10,
        }
    }
}

/// Recommendation engine instance
///
/// Owns the catalog and its similarity index. Construct once at startup
/// and share behind an `Arc` (or `actix_web::web::Data`); there is no
/// write path after construction.
pub struct RecoEngine {
    config: RecoConfig,
    catalog: Catalog,
    index: SimilarityIndex,
}

impl RecoEngine {
    /// Build an engine over an already-loaded catalog.
    pub fn new(catalog: Catalog, config: RecoConfig) -> Self {
        let index = SimilarityIndex::build(&catalog);
        info!(
            catalog_size = catalog.len(),
            indexed = index.len(),
            "recommendation engine ready"
        );
        Self {
            config,
            catalog,
            index,
        }
    }

    /// Load the catalog from a CSV source and build the engine.
    ///
    /// The load is the process's one blocking startup cost; an unreadable
    /// source yields an engine over an empty catalog, never a failure.
    pub fn from_source(path: &Path, row_cap: usize, config: RecoConfig) -> Self {
        let catalog = Catalog::load(path, row_cap);
        Self::new(catalog, config)
    }

    pub fn with_default_config(catalog: Catalog) -> Self {
        Self::new(catalog, RecoConfig::default())
    }

    pub fn config(&self) -> &RecoConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// Items most similar to the catalog entry titled `title`, best first.
    ///
    /// Returns at most `k` items, never the queried item, with result
    /// titles deduplicated. An unknown title or an empty index returns an
    /// empty list; callers use absence-of-result as the fallback signal.
    pub fn similar_to(&self, title: &str, k: usize) -> Vec<Book> {
        let Some(position) = self.catalog.position_by_title(title) else {
            return Vec::new();
        };
        if self.index.is_empty() {
            return Vec::new();
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(canonical_key(title));

        let mut results = Vec::with_capacity(k);
        for candidate in self.index.ranked_from(position) {
            if results.len() == k {
                break;
            }
            let book = &self.catalog.books()[candidate];
            if seen.insert(canonical_key(&book.title)) {
                results.push(book.clone());
            }
        }
        results
    }

    /// Up to `n` catalog items drawn with the supplied random source.
    ///
    /// The catalog carries no popularity signal, so this is a random
    /// fallback, not a quality ranking; under a seeded RNG the draw is
    /// deterministic. When `n` covers the whole catalog, all items are
    /// returned in catalog order.
    pub fn popular_with<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<Book> {
        let len = self.catalog.len();
        if n >= len {
            return self.catalog.books().to_vec();
        }
        rand::seq::index::sample(rng, len, n)
            .into_iter()
            .map(|i| self.catalog.books()[i].clone())
            .collect()
    }

    /// [`Self::popular_with`] using the thread-local random source.
    pub fn popular(&self, n: usize) -> Vec<Book> {
        self.popular_with(n, &mut rand::thread_rng())
    }

    /// Case-insensitive substring search over title and author.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Book> {
        self.catalog
            .search(query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Ranked, deduplicated recommendations for `user_id` given their
    /// rating history, with the supplied random source driving seed
    /// subsampling and the popularity fallback.
    ///
    /// Pure given its inputs; never errors. Sparse history, an empty
    /// catalog, and an empty index all degrade to (possibly empty) lists.
    pub fn recommend_with<R: Rng>(
        &self,
        user_id: &str,
        history: &[RatingRecord],
        n: usize,
        rng: &mut R,
    ) -> Vec<Book> {
        recommendation::blend(self, user_id, history, n, rng)
    }

    /// [`Self::recommend_with`] using the configured default result count
    /// and the thread-local random source.
    pub fn recommend(&self, user_id: &str, history: &[RatingRecord]) -> Vec<Book> {
        self.recommend_with(
            user_id,
            history,
            self.config.default_results,
            &mut rand::thread_rng(),
        )
    }
}

#[cfg(test)]
mod tests;
