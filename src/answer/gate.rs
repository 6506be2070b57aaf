//! The confidence gate: accepts or refuses the top ranked candidate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenize;
use crate::answer::snippet::best_snippet;
use crate::config::SnippetConfig;
use crate::query::intent::detect_intents;
use crate::search::{Candidate, SearchIndex};

/// An accepted answer with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    /// Snippet selected from the candidate body.
    pub snippet: String,

    /// Source document name.
    pub source_file: String,

    /// 1-based page number in the source document.
    pub page_number: usize,
}

/// Outcome of gating the top ranked candidate.
///
/// `NoAnswer` is a first-class outcome, not an error: it means the engine
/// found nothing it can support with literal token evidence. Pipeline faults
/// are reported separately as [`crate::error::RehberError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateOutcome {
    /// The top candidate passed every check.
    Answer(AnswerPayload),

    /// No candidate could be confidently supported.
    NoAnswer,
}

impl GateOutcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, GateOutcome::Answer(_))
    }
}

/// Applies the anti-hallucination checks to ranked candidates.
///
/// All checks run against the raw, unexpanded query tokens; expansion terms
/// never count as evidence, and score magnitude never bypasses a rejection.
#[derive(Debug, Clone)]
pub struct AnswerGate {
    snippet: SnippetConfig,
}

impl AnswerGate {
    pub fn new(snippet: SnippetConfig) -> Self {
        AnswerGate { snippet }
    }

    /// Gate the top candidate and, on acceptance, extract its answer window.
    pub fn gate_and_answer(
        &self,
        index: &SearchIndex,
        raw_query: &str,
        candidates: &[Candidate],
    ) -> GateOutcome {
        let Some(top) = candidates.first() else {
            return GateOutcome::NoAnswer;
        };
        let record = &index.records()[top.position];

        let raw_tokens: HashSet<String> = tokenize(raw_query).into_iter().collect();
        let combined: HashSet<&str> = record
            .title_tokens
            .iter()
            .chain(record.keyword_tokens.iter())
            .chain(record.body_tokens.iter())
            .map(String::as_str)
            .collect();

        // Literal evidence: at least one raw query token must appear in the
        // candidate. An empty query never passes.
        if !raw_tokens.iter().any(|token| combined.contains(token.as_str())) {
            return GateOutcome::NoAnswer;
        }

        let intents = detect_intents(raw_query);

        // Appeal-domain candidates need an appeal query.
        if !intents.appeal && combined.contains("itiraz") {
            return GateOutcome::NoAnswer;
        }

        // Pass-grade queries need concrete grading evidence in the body.
        if intents.pass_grade {
            let body: HashSet<&str> = record.body_tokens.iter().map(String::as_str).collect();
            let has_exam_pair = body.contains("final") && body.contains("vize");
            let has_digit = record
                .body_tokens
                .iter()
                .any(|token| token.chars().any(|ch| ch.is_ascii_digit()));
            let has_percent = record.body_tokens.iter().any(|token| token.contains('%'));
            if !has_exam_pair && !has_digit && !has_percent {
                return GateOutcome::NoAnswer;
            }
        }

        GateOutcome::Answer(AnswerPayload {
            snippet: best_snippet(&record.body, raw_query, self.snippet.max_chars),
            source_file: record.source_file.clone(),
            page_number: record.page_number,
        })
    }
}
