//! Edit-distance similarity for fuzzy term lookup.

use std::cmp::{Ordering, min};

/// Levenshtein distance between two tokens.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row = vec![0; b_chars.len() + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = if a_ch == b_ch { 0 } else { 1 };
            curr_row[j + 1] = min(
                min(
                    prev_row[j + 1] + 1, // deletion
                    curr_row[j] + 1,     // insertion
                ),
                prev_row[j] + cost, // substitution
            );
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// Normalized similarity ratio in [0, 1]; 1.0 means identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (levenshtein_distance(a, b) as f64 / max_len as f64)
}

/// Up to `limit` vocabulary terms whose similarity to `word` is at least
/// `cutoff`, best first. Ties keep vocabulary order for determinism.
pub fn close_matches(word: &str, vocabulary: &[String], limit: usize, cutoff: f64) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = vocabulary
        .iter()
        .filter_map(|term| {
            let ratio = similarity_ratio(word, term);
            (ratio >= cutoff).then_some((ratio, term))
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, term)| term.clone())
        .collect()
}
