//! Coarse intent detection from a raw query.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::{fold_lower, tokenize};

/// Boolean intent flags detected from a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIntents {
    /// The query asks about pass grades, thresholds, or averages.
    pub pass_grade: bool,

    /// The query asks about a formal grade appeal.
    pub appeal: bool,
}

/// Stemmed tokens whose presence signals the pass-grade intent.
const PASS_GRADE_TOKENS: &[&str] = &["gecme", "gecer", "baraj", "not", "ortalama"];

/// Phrases whose occurrence in the folded query signals the pass-grade intent.
const PASS_GRADE_PHRASES: &[&str] = &[
    "gecme",
    "gecer",
    "baraj",
    "gecme notu",
    "gecer not",
    "not ortalamasi",
    "not",
    "ortalama",
];

/// Phrases whose occurrence in the folded query signals the appeal intent.
const APPEAL_PHRASES: &[&str] = &["itiraz", "dilekce", "sonuca"];

/// Detect intent flags from the raw query text.
pub fn detect_intents(query: &str) -> QueryIntents {
    let folded = fold_lower(query);
    let tokens: HashSet<String> = tokenize(&folded).into_iter().collect();

    let pass_grade = PASS_GRADE_TOKENS.iter().any(|token| tokens.contains(*token))
        || PASS_GRADE_PHRASES.iter().any(|phrase| folded.contains(phrase));
    let appeal = tokens.contains("itiraz")
        || APPEAL_PHRASES.iter().any(|phrase| folded.contains(phrase));

    QueryIntents { pass_grade, appeal }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_grade_intent() {
        assert!(detect_intents("gecme notu kac olmali").pass_grade);
        assert!(detect_intents("dersin gecer notu").pass_grade);
        assert!(detect_intents("not ortalamasi nasil hesaplanir").pass_grade);
        assert!(!detect_intents("butunleme tarihi ne zaman").pass_grade);
    }

    #[test]
    fn test_appeal_intent() {
        assert!(detect_intents("sinav sonucuna itiraz").appeal);
        assert!(detect_intents("dilekce nereye verilir").appeal);
        assert!(!detect_intents("vize tarihleri").appeal);
    }

    #[test]
    fn test_intents_fold_turkish_input() {
        // "itirazı" folds and stems to the trigger token.
        assert!(detect_intents("notuma itirazım var").appeal);
    }

    #[test]
    fn test_empty_query_has_no_intents() {
        assert_eq!(detect_intents(""), QueryIntents::default());
    }
}
