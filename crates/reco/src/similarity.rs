//! TF-IDF content-similarity index
//!
//! Built once over the catalog immediately after load: each item's
//! `title + author + publisher` text becomes a term-weighted vector, and
//! the full pairwise cosine matrix is precomputed so request-time queries
//! are a ranked row scan. Read-only after construction.
//!
//! Weighting follows the usual smoothed TF-IDF: raw term counts scaled by
//! `ln((1 + n) / (1 + df)) + 1`, document vectors L2-normalized, so cosine
//! similarity reduces to a sparse dot product.

use std::collections::HashMap;
use std::time::Instant;

use bookshelf_core::math::{l2_norm, sparse_dot};
use ndarray::Array2;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::stopwords;

/// Precomputed pairwise content-similarity scores over the catalog,
/// keyed by item position.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    matrix: Array2<f32>,
}

impl SimilarityIndex {
    /// An index with no entries; every query returns empty results.
    pub fn empty() -> Self {
        Self {
            matrix: Array2::zeros((0, 0)),
        }
    }

    /// Build the index over `catalog`.
    ///
    /// Degenerate inputs (an empty catalog, or text that leaves no
    /// informative vocabulary after stop-word and short-token removal)
    /// yield an empty index rather than an error.
    pub fn build(catalog: &Catalog) -> Self {
        if catalog.is_empty() {
            warn!("catalog is empty, similarity index not built");
            return Self::empty();
        }

        let started = Instant::now();

        let documents: Vec<Vec<String>> = catalog
            .books()
            .iter()
            .map(|b| tokenize(&b.combined_text()))
            .collect();

        let mut vocabulary: HashMap<&str, u32> = HashMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();
        for tokens in &documents {
            let mut seen_in_doc: Vec<u32> = Vec::new();
            for token in tokens {
                let next_id = vocabulary.len() as u32;
                let id = *vocabulary.entry(token.as_str()).or_insert_with(|| {
                    doc_freq.push(0);
                    next_id
                });
                if !seen_in_doc.contains(&id) {
                    seen_in_doc.push(id);
                    doc_freq[id as usize] += 1;
                }
            }
        }

        if vocabulary.is_empty() {
            warn!("vocabulary is empty after preprocessing, similarity index not built");
            return Self::empty();
        }

        let n = documents.len();
        let vectors: Vec<Vec<(u32, f32)>> = documents
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<u32, f32> = HashMap::new();
                for token in tokens {
                    let id = vocabulary[token.as_str()];
                    *counts.entry(id).or_insert(0.0) += 1.0;
                }
                let mut vector: Vec<(u32, f32)> = counts
                    .into_iter()
                    .map(|(id, tf)| {
                        let df = doc_freq[id as usize] as f32;
                        let idf = ((1.0 + n as f32) / (1.0 + df)).ln() + 1.0;
                        (id, tf * idf)
                    })
                    .collect();
                vector.sort_by_key(|&(id, _)| id);
                let norm = l2_norm(&vector.iter().map(|&(_, w)| w).collect::<Vec<_>>());
                if norm > 0.0 {
                    for entry in &mut vector {
                        entry.1 /= norm;
                    }
                }
                vector
            })
            .collect();

        let mut matrix = Array2::<f32>::zeros((n, n));
        for i in 0..n {
            matrix[[i, i]] = sparse_dot(&vectors[i], &vectors[i]);
            for j in (i + 1)..n {
                let score = sparse_dot(&vectors[i], &vectors[j]);
                matrix[[i, j]] = score;
                matrix[[j, i]] = score;
            }
        }

        info!(
            items = n,
            vocabulary = vocabulary.len(),
            elapsed = ?started.elapsed(),
            "similarity index built"
        );

        Self { matrix }
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    /// Similarity score between two item positions, 0.0 when out of range.
    pub fn score(&self, a: usize, b: usize) -> f32 {
        if a < self.len() && b < self.len() {
            self.matrix[[a, b]]
        } else {
            0.0
        }
    }

    /// All other item positions ranked by descending similarity to
    /// `index`; ties keep catalog order (stable sort over the
    /// catalog-ordered positions).
    pub fn ranked_from(&self, index: usize) -> Vec<usize> {
        if index >= self.len() {
            return Vec::new();
        }
        let mut others: Vec<usize> = (0..self.len()).filter(|&j| j != index).collect();
        others.sort_by(|&a, &b| {
            self.matrix[[index, b]]
                .partial_cmp(&self.matrix[[index, a]])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        others
    }
}

/// Lowercase, split on non-alphanumeric runs, drop single-character tokens
/// and English stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !stopwords::is_stop_word(t))
        .map(str::to_string)
        .collect()
}
