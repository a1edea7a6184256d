//! Minimal, deterministic text normalization helpers shared by extraction and scoring.

/// Collapse every run of whitespace into a single ASCII space and trim both ends.
pub fn norm_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words in `s`.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Lowercased keyword tokens in document order.
///
/// - anything that is not alphanumeric or `_` separates tokens
/// - a token is kept only if it has at least two characters and every character is alphabetic
///
/// So "don't" yields "don" (the lone "t" is dropped), "x86" and "2024" are dropped, and
/// "Café" becomes "café".
pub fn word_tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().nth(1).is_some())
        .filter(|t| t.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}
