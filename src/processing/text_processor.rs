//! Tokenization and lexical overlap

use std::collections::HashSet;

/// Lowercase, turn every non-alphanumeric character into a separator and
/// keep tokens of at least `min_chars` characters.
pub fn tokenize(text: &str, min_chars: usize) -> Vec<String> {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    spaced
        .split_whitespace()
        .filter(|token| token.chars().count() >= min_chars)
        .map(str::to_string)
        .collect()
}

pub fn token_set(text: &str, min_chars: usize) -> HashSet<String> {
    tokenize(text, min_chars).into_iter().collect()
}

/// `|a ∩ b| / max(|a|, |b|)`, zero when both sets are empty.
///
/// The larger set is the denominator, so a short bullet fully contained in a
/// long posting still scores low.
pub fn overlap_ratio(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let denominator = a.len().max(b.len());
    if denominator == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / denominator as f32
}
