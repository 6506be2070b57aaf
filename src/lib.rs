//! # Rehber
//!
//! A local document question-answering engine for Rust.
//!
//! Rehber turns a closed set of loosely structured documents into an
//! in-memory, queryable knowledge base and answers natural-language
//! questions against it. When the evidence is weak it refuses to answer
//! instead of fabricating one.
//!
//! ## Features
//!
//! - Multi-strategy page text extraction with a layout fallback cascade
//! - Turkish character folding, light stemming, and bigram analysis
//! - Synonym, alias, and intent driven query expansion with fuzzy matching
//! - Per-field BM25 ranking with phrase and intent aware boosting
//! - A confidence gate that withholds answers absent literal token evidence

pub mod analysis;
pub mod answer;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod query;
pub mod search;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
