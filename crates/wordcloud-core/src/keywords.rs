//! Single-document TF-IDF keyword scoring.
//!
//! With one document the smoothed IDF, `ln((1 + n) / (1 + df)) + 1`, is exactly 1 for every
//! term, so a term's score is its raw count. Scores are L2-normalized and then rescaled so the
//! top term has weight 1.0. No corpus index is kept.

use crate::stopwords::is_stop_word;
use crate::textprep::{word_count, word_tokens};
use crate::KeywordEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default cap on the number of returned terms.
pub const DEFAULT_MAX_FEATURES: usize = 50;

/// Texts with fewer whitespace-separated words than this are not scored.
pub const MIN_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub max_features: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

/// Count unigrams and contiguous bigrams over the stop-word-filtered token stream.
fn term_counts(text: &str) -> BTreeMap<String, u64> {
    let tokens: Vec<String> = word_tokens(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .collect();

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for t in &tokens {
        *counts.entry(t.clone()).or_insert(0) += 1;
    }
    for w in tokens.windows(2) {
        *counts.entry(format!("{} {}", w[0], w[1])).or_insert(0) += 1;
    }
    counts
}

/// Rank the terms of `text` by single-document TF-IDF weight.
///
/// Returns an empty vec when the text has fewer than [`MIN_WORDS`] words, when `max_features`
/// is 0, or when no term survives tokenization and stop-word removal. Otherwise at most
/// `max_features` entries, sorted by weight descending then term ascending; the first entry
/// always has weight 1.0.
pub fn extract_keywords_tfidf(text: &str, max_features: usize) -> Vec<KeywordEntry> {
    if max_features == 0 || word_count(text) < MIN_WORDS {
        return Vec::new();
    }

    // BTreeMap iteration is term-ascending, and the sort below is stable, so equal counts stay
    // in lexicographic order.
    let mut retained: Vec<(String, u64)> = term_counts(text).into_iter().collect();
    if retained.is_empty() {
        return Vec::new();
    }
    if retained.len() > max_features {
        retained.sort_by(|a, b| b.1.cmp(&a.1));
        retained.truncate(max_features);
    }

    let norm = retained
        .iter()
        .map(|(_, c)| (*c as f64) * (*c as f64))
        .sum::<f64>()
        .sqrt();
    let scored: Vec<(String, f64)> = retained
        .into_iter()
        .map(|(term, c)| {
            let score = if norm > 0.0 { c as f64 / norm } else { 0.0 };
            (term, score)
        })
        .collect();

    let max_score = scored.iter().map(|(_, s)| *s).fold(0.0_f64, f64::max);
    let divisor = if max_score > 0.0 { max_score } else { 1.0 };

    let mut out: Vec<KeywordEntry> = scored
        .into_iter()
        .map(|(term, score)| KeywordEntry {
            term,
            weight: score / divisor,
        })
        .collect();
    out.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.term.cmp(&b.term))
    });
    out
}
