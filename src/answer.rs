//! Answering: the confidence gate and query-aware snippet extraction.
//!
//! The gate is the anti-hallucination contract of the whole pipeline: no
//! candidate is surfaced without literal token evidence from the raw,
//! unexpanded query, and no score magnitude can bypass the checks.

pub mod gate;
pub mod snippet;

pub use gate::{AnswerGate, AnswerPayload, GateOutcome};
pub use snippet::{best_snippet, strip_keyword_line};
