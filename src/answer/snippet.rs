//! Query-aware snippet extraction from an answer body.

use std::sync::LazyLock;

use ahash::AHashSet;
use regex::Regex;

use crate::analysis::tokenize;

/// Trailing keyword line, stripped before snippet selection.
static KEYWORD_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Anahtar\s*Kelimeler\s*[:\-].*").unwrap());

/// Window size bounds, in tokens.
const MIN_WINDOW: usize = 40;
const MAX_WINDOW: usize = 120;

/// Minimum window step, in tokens.
const MIN_STEP: usize = 10;

/// Remove a trailing "Anahtar Kelimeler:" line from an answer body.
pub fn strip_keyword_line(body: &str) -> String {
    KEYWORD_TAIL_RE.replace_all(body, "").trim().to_string()
}

/// Select the token window densest in query terms and fit it to the
/// character budget.
///
/// Bodies within the budget are returned unchanged. Otherwise a window
/// (clamped to [40, 120] tokens, scaled to a quarter of the body) slides in
/// steps of `max(10, window / 3)`; the first window with maximal query-term
/// overlap wins. The joined window is truncated at the last word boundary
/// inside the budget, with an ellipsis marker when truncation occurred.
pub fn best_snippet(body: &str, query: &str, max_chars: usize) -> String {
    let clean = strip_keyword_line(body);
    if clean.chars().count() <= max_chars {
        return clean;
    }

    let tokens = tokenize(&clean);
    if tokens.is_empty() {
        return clean.chars().take(max_chars).collect();
    }
    let query_tokens: AHashSet<String> = tokenize(query).into_iter().collect();

    let window = (tokens.len() / 4).clamp(MIN_WINDOW, MAX_WINDOW);
    let step = MIN_STEP.max(window / 3);

    let mut best_start = 0;
    let mut best_hits = -1i64;
    let mut start = 0;
    while start < tokens.len() {
        let end = (start + window).min(tokens.len());
        let distinct: AHashSet<&str> = tokens[start..end].iter().map(String::as_str).collect();
        let hits = distinct
            .iter()
            .filter(|token| query_tokens.contains(**token))
            .count() as i64;
        if hits > best_hits {
            best_hits = hits;
            best_start = start;
        }
        start += step;
    }

    let end = (best_start + window).min(tokens.len());
    let snippet = tokens[best_start..end].join(" ");
    if snippet.chars().count() <= max_chars {
        return snippet;
    }

    let prefix: String = snippet.chars().take(max_chars).collect();
    let cut = match prefix.rfind(' ') {
        Some(boundary) => &prefix[..boundary],
        None => prefix.as_str(),
    };
    format!("{cut}...")
}
