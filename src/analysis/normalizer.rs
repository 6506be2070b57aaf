//! Character folding, tokenization, bigrams, and page-text cleanup.

use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::stemmer::stem;

/// Punctuation outside a small whitelist (percent, slash, period, hyphen,
/// parentheses, comma, colon) is replaced by a space.
static PUNCT_SCRUB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s%/.\-(),:]").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Maximal runs of lowercase letters, digits, or the percent sign.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9%]+").unwrap());

/// A word split across a line break by a hyphen.
static HYPHEN_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w)-\n(\w)").unwrap());

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Fold a single character to its ASCII base form.
///
/// Returns `None` for combining diacritics, which are dropped entirely.
fn fold_char(ch: char) -> Option<char> {
    let folded = match ch {
        'ç' | 'Ç' => 'c',
        'ğ' | 'Ğ' => 'g',
        'ı' | 'İ' => 'i',
        'ö' | 'Ö' => 'o',
        'ş' | 'Ş' => 's',
        'ü' | 'Ü' => 'u',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'Ò' | 'Ó' | 'Ô' | 'Õ' => 'o',
        'ù' | 'ú' | 'û' | 'Ù' | 'Ú' | 'Û' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ý' | 'ÿ' | 'Ý' => 'y',
        '\u{0300}'..='\u{036f}' => return None,
        other => other,
    };
    Some(folded)
}

/// Fold extended-Latin letters to ASCII, lowercase, scrub punctuation outside
/// the whitelist, and collapse whitespace runs to single spaces.
pub fn fold_lower(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(base) = fold_char(ch) {
            folded.extend(base.to_lowercase());
        }
    }
    let scrubbed = PUNCT_SCRUB_RE.replace_all(&folded, " ");
    WHITESPACE_RE.replace_all(&scrubbed, " ").trim().to_string()
}

/// Tokenize text into stemmed tokens over the folded ASCII alphabet.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = fold_lower(text);
    TOKEN_RE
        .find_iter(&folded)
        .map(|m| stem(m.as_str()).to_string())
        .collect()
}

/// Adjacent token pairs joined by a single space; n tokens yield n - 1 bigrams.
pub fn bigrams(tokens: &[String]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// Clean raw page text: drop soft hyphens and zero-width spaces, map the
/// private-use bullet to `•`, merge hyphenated line-break splits, fold line
/// breaks to spaces, and collapse repeated whitespace.
pub fn clean_page_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text
        .replace('\u{00ad}', "")
        .replace('\u{200b}', "")
        .replace('\u{f0b7}', "•");
    let text = HYPHEN_BREAK_RE.replace_all(&text, "${1}${2}");
    let text = text.replace('\r', "\n").replace('\n', " ");
    MULTI_SPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Split text into trimmed, non-empty sentences after `.`, `!`, or `?`
/// followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?')
            && chars.peek().is_some_and(|&(_, next)| next.is_whitespace())
        {
            let end = i + ch.len_utf8();
            let piece = text[start..end].trim();
            if !piece.is_empty() {
                sentences.push(piece.to_string());
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}
