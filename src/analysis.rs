//! Text analysis for Turkish document and query text.
//!
//! This module provides the normalization pipeline shared by ingestion,
//! indexing, and query handling: character folding to ASCII, tokenization,
//! light suffix stemming, and bigram derivation. Every token that reaches
//! the index or a query comparison goes through the same pipeline, so the
//! two sides always agree on token identity.

pub mod normalizer;
pub mod stemmer;

pub use normalizer::{bigrams, clean_page_text, fold_lower, split_sentences, tokenize};
pub use stemmer::stem;
