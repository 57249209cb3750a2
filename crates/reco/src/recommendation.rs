//! Recommendation blending
//!
//! Turns a user's rating history into a ranked, deduplicated list of
//! suggestions. The pipeline is a sequence of plain data transformations
//! (filter history, select seeds, expand by similarity, count occurrences,
//! sort, backfill) so each stage stays independently auditable. There is
//! no trained model here: a candidate reachable from several liked items
//! simply outranks one reachable from a single item.
//!
//! Every branch terminates in a (possibly empty) list; empty history,
//! empty catalog, and an empty index are normal inputs, not errors.

use std::collections::{HashMap, HashSet};

use bookshelf_core::models::{Book, RatingRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use validator::Validate;

use crate::catalog::canonical_key;
use crate::RecoEngine;

/// Which partition of the history a seed came from; controls how many of
/// its similar items are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeedTier {
    StronglyLiked, // rated 5
    Liked,         // rated 4
}

pub(crate) fn blend<R: Rng>(
    engine: &RecoEngine,
    user_id: &str,
    history: &[RatingRecord],
    n: usize,
    rng: &mut R,
) -> Vec<Book> {
    // Malformed entries are skipped individually, mirroring the catalog
    // loader's skip-bad-rows policy.
    let valid: Vec<&RatingRecord> = history.iter().filter(|r| r.validate().is_ok()).collect();
    if valid.len() < history.len() {
        debug!(
            user_id,
            skipped = history.len() - valid.len(),
            "skipping malformed rating entries"
        );
    }

    // Everything the user ever rated is off the table, at any rating.
    let rated: HashSet<&str> = valid.iter().map(|r| canonical_key(&r.book_title)).collect();

    let five: Vec<&RatingRecord> = valid.iter().filter(|r| r.rating == 5).copied().collect();
    let four: Vec<&RatingRecord> = valid.iter().filter(|r| r.rating == 4).copied().collect();

    if five.is_empty() && four.is_empty() {
        debug!(user_id, "no liked items in history, using popular fallback");
        return cold_start(engine, &rated, rng);
    }

    let seeds = select_seeds(&five, &four, engine, rng);
    let ranked = expand_and_rank(engine, &seeds, &rated);
    let filled = backfill(engine, ranked, &rated, n, rng);

    filled.into_iter().take(n).collect()
}

/// Cold-start path: popularity fallback, still filtered against rated
/// titles so a low-rated item can never be re-recommended.
pub(crate) fn cold_start<R: Rng>(
    engine: &RecoEngine,
    rated: &HashSet<&str>,
    rng: &mut R,
) -> Vec<Book> {
    engine
        .popular_with(engine.config().cold_start_count, rng)
        .into_iter()
        .filter(|b| !rated.contains(canonical_key(&b.title)))
        .collect()
}

/// Select up to `max_five_star_seeds` from the strongly-liked partition,
/// then fill remaining slots up to `max_seeds` from the liked partition.
/// Oversized partitions are randomly subsampled so recommendations do not
/// always stem from the same fixed slice of history.
pub(crate) fn select_seeds<'a, R: Rng>(
    five: &[&'a RatingRecord],
    four: &[&'a RatingRecord],
    engine: &RecoEngine,
    rng: &mut R,
) -> Vec<(&'a RatingRecord, SeedTier)> {
    let config = engine.config();
    let mut seeds: Vec<(&RatingRecord, SeedTier)> = Vec::new();

    if five.len() > config.max_five_star_seeds {
        for r in five.choose_multiple(rng, config.max_five_star_seeds) {
            seeds.push((*r, SeedTier::StronglyLiked));
        }
    } else {
        for r in five {
            seeds.push((*r, SeedTier::StronglyLiked));
        }
    }

    let remaining = config.max_seeds.saturating_sub(seeds.len());
    if four.len() > remaining {
        for r in four.choose_multiple(rng, remaining) {
            seeds.push((*r, SeedTier::Liked));
        }
    } else {
        for r in four {
            seeds.push((*r, SeedTier::Liked));
        }
    }

    seeds
}

/// Expand each seed through the similarity index and rank candidates by
/// how many distinct seed expansions they appeared in. Ties keep
/// first-seen order (stable sort over the expansion order).
pub(crate) fn expand_and_rank(
    engine: &RecoEngine,
    seeds: &[(&RatingRecord, SeedTier)],
    rated: &HashSet<&str>,
) -> Vec<Book> {
    let config = engine.config();
    let mut first_seen: Vec<Book> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for (seed, tier) in seeds {
        let keep = match tier {
            SeedTier::StronglyLiked => config.five_star_keep,
            SeedTier::Liked => config.four_star_keep,
        };

        let mut kept = 0usize;
        for candidate in engine.similar_to(&seed.book_title, config.similar_k) {
            if kept == keep {
                break;
            }
            let key = canonical_key(&candidate.title);
            if rated.contains(key) {
                continue;
            }
            kept += 1;
            match counts.get_mut(key) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(key.to_string(), 1);
                    first_seen.push(candidate);
                }
            }
        }
    }

    let mut ranked = first_seen;
    ranked.sort_by_key(|b| {
        std::cmp::Reverse(counts.get(canonical_key(&b.title)).copied().unwrap_or(0))
    });
    ranked
}

/// Append popular items until the result reaches the minimum floor,
/// skipping rated titles and titles already chosen.
pub(crate) fn backfill<R: Rng>(
    engine: &RecoEngine,
    mut ranked: Vec<Book>,
    rated: &HashSet<&str>,
    n: usize,
    rng: &mut R,
) -> Vec<Book> {
    let floor = engine.config().min_results;
    if ranked.len() >= floor {
        return ranked;
    }

    let mut chosen: HashSet<String> = ranked
        .iter()
        .map(|b| canonical_key(&b.title).to_string())
        .collect();

    for book in engine.popular_with(n.max(floor), rng) {
        if ranked.len() >= floor {
            break;
        }
        let key = canonical_key(&book.title);
        if rated.contains(key) || chosen.contains(key) {
            continue;
        }
        chosen.insert(key.to_string());
        ranked.push(book);
    }

    ranked
}
