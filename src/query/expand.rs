//! Query expansion: synonyms, aliases, intent terms, and fuzzy matches.

use crate::analysis::{fold_lower, tokenize};
use crate::query::fuzzy::close_matches;
use crate::query::intent::{QueryIntents, detect_intents};
use crate::query::lexicon::{SYNONYMS, resolve_alias};

/// Similarity cutoff for fuzzy expansion against the index vocabulary.
const FUZZY_CUTOFF: f64 = 0.82;

/// Per-token cap on fuzzy expansion terms.
const FUZZY_LIMIT: usize = 3;

/// Domain terms injected when the pass-grade intent is active.
const PASS_GRADE_BOOST_TERMS: &str = "final vize yuzde % oran 50 puan baraj ortalama gecme gecer";

/// A raw query expanded against the lexicon, detected intents, and the index
/// vocabulary.
#[derive(Debug, Clone)]
pub struct ExpandedQuery {
    /// Tokens of the raw query, before any expansion.
    pub raw_tokens: Vec<String>,

    /// Raw tokens followed by every expansion term, in derivation order.
    pub terms: Vec<String>,

    /// Intents detected from the raw query.
    pub intents: QueryIntents,
}

/// Expands queries with synonym, alias, intent, and fuzzy terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExpander;

impl QueryExpander {
    pub fn new() -> Self {
        QueryExpander
    }

    /// Expand a raw query against the given index vocabulary.
    ///
    /// Expansion terms are added to, never replace, the literal query tokens.
    pub fn expand(&self, query: &str, vocabulary: &[String]) -> ExpandedQuery {
        let raw_tokens = tokenize(query);
        let mut terms = raw_tokens.clone();
        terms.extend(self.synonym_terms(query));
        terms.extend(self.fuzzy_terms(&raw_tokens, vocabulary));

        ExpandedQuery {
            raw_tokens,
            terms,
            intents: detect_intents(query),
        }
    }

    /// Dictionary synonyms, single-token alias handling, and intent-driven
    /// domain terms.
    fn synonym_terms(&self, query: &str) -> Vec<String> {
        let folded = fold_lower(query);
        let mut extra = Vec::new();

        for (base, alternatives) in SYNONYMS {
            if folded.contains(base) {
                for alternative in *alternatives {
                    extra.extend(tokenize(alternative));
                }
            }
        }

        let tokens = tokenize(query);
        if let [key] = tokens.as_slice() {
            if let Some(canonical) = resolve_alias(key) {
                extra.extend(tokenize(canonical));
            }
            for (base, alternatives) in SYNONYMS {
                if key == base || base.split_whitespace().any(|word| word == key) {
                    for alternative in *alternatives {
                        extra.extend(tokenize(alternative));
                    }
                }
            }
        }

        if detect_intents(query).pass_grade {
            extra.extend(tokenize(PASS_GRADE_BOOST_TERMS));
        }

        extra
    }

    /// Per raw token: alias resolution plus near-matches from the vocabulary.
    fn fuzzy_terms(&self, raw_tokens: &[String], vocabulary: &[String]) -> Vec<String> {
        let mut extra = Vec::new();
        for token in raw_tokens {
            if let Some(canonical) = resolve_alias(token) {
                extra.extend(tokenize(canonical));
            }
            extra.extend(close_matches(token, vocabulary, FUZZY_LIMIT, FUZZY_CUTOFF));
        }
        extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(query: &str, vocabulary: &[&str]) -> ExpandedQuery {
        let vocabulary: Vec<String> = vocabulary.iter().map(|t| t.to_string()).collect();
        QueryExpander::new().expand(query, &vocabulary)
    }

    #[test]
    fn test_literal_tokens_always_kept() {
        let expanded = expand("butunleme sinavi ne zaman", &[]);
        assert_eq!(expanded.raw_tokens, vec!["butunleme", "sinav", "ne", "zaman"]);
        for token in &expanded.raw_tokens {
            assert!(expanded.terms.contains(token));
        }
    }

    #[test]
    fn test_synonym_phrase_expansion() {
        let expanded = expand("gecme notu kac", &[]);
        // "gecme notu" pulls in its alternatives, tokenized and stemmed.
        assert!(expanded.terms.contains(&"baraj".to_string()));
        assert!(expanded.terms.contains(&"basar".to_string()));
    }

    #[test]
    fn test_single_token_alias_expansion() {
        let expanded = expand("büt", &[]);
        assert_eq!(expanded.raw_tokens, vec!["but"]);
        assert!(expanded.terms.contains(&"butunleme".to_string()));
    }

    #[test]
    fn test_pass_grade_intent_injects_domain_terms() {
        let expanded = expand("gecer not", &[]);
        assert!(expanded.intents.pass_grade);
        assert!(expanded.terms.contains(&"%".to_string()));
        assert!(expanded.terms.contains(&"50".to_string()));
        assert!(expanded.terms.contains(&"vize".to_string()));
    }

    #[test]
    fn test_fuzzy_expansion_adds_vocabulary_terms() {
        let expanded = expand("butunlame", &["butunleme", "vize"]);
        assert!(expanded.terms.contains(&"butunleme".to_string()));
        // The misspelled literal token survives expansion.
        assert!(expanded.terms.contains(&"butunlame".to_string()));
    }

    #[test]
    fn test_no_expansion_for_unknown_terms() {
        let expanded = expand("kuantum fizigi", &[]);
        assert_eq!(expanded.terms, expanded.raw_tokens);
        assert!(!expanded.intents.pass_grade);
        assert!(!expanded.intents.appeal);
    }
}
