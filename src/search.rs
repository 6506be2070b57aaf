//! Indexing and ranking: the immutable BM25 index and the scoring engine.

pub mod index;
pub mod ranker;

pub use index::{Field, SearchIndex};
pub use ranker::{Candidate, RankingEngine};
