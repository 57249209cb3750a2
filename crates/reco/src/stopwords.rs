//! English stop words for similarity-text preprocessing
//!
//! Common words ("the", "and", "of", ...) carry no signal for content
//! similarity and are excluded from the TF-IDF vocabulary. The list is the
//! usual English set in the NLTK/sklearn tradition, trimmed to words that
//! plausibly occur in title/author/publisher text.

use std::collections::HashSet;
use std::sync::OnceLock;

static ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "co", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "inc", "into", "is", "it", "its",
    "itself", "just", "ltd", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

fn english_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH.iter().copied().collect())
}

/// Whether `token` (already lowercased) is an English stop word.
pub(crate) fn is_stop_word(token: &str) -> bool {
    english_set().contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_words_are_stop_words() {
        for word in ["the", "and", "of", "a", "in"] {
            assert!(is_stop_word(word), "{word} should be a stop word");
        }
    }

    #[test]
    fn test_content_words_are_not_stop_words() {
        for word in ["dune", "herbert", "foundation", "asimov", "publishing"] {
            assert!(!is_stop_word(word), "{word} should not be a stop word");
        }
    }
}
