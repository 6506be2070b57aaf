//! The retrievable record unit and its cached analysis fields.

use serde::{Deserialize, Serialize};

use crate::analysis::{bigrams, tokenize};

/// One retrievable unit extracted from a document page.
///
/// Token and bigram fields are derived exactly once at construction, through
/// the shared normalization pipeline, and are never recomputed during
/// scoring. Records are immutable once ingested; rebuilding the corpus
/// produces new records rather than mutating old ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Short title or question text.
    pub question: String,

    /// Answer body text.
    pub body: String,

    /// Name of the source document.
    pub source_file: String,

    /// 1-based page number within the source document.
    pub page_number: usize,

    /// Ordered, deduplicated keywords, at most 12.
    pub keywords: Vec<String>,

    /// Whether this record came from a heading-delimited chunk.
    pub is_heading_derived: bool,

    /// Cached tokens of `question`.
    pub title_tokens: Vec<String>,

    /// Cached tokens of the joined `keywords`.
    pub keyword_tokens: Vec<String>,

    /// Cached tokens of `body`.
    pub body_tokens: Vec<String>,

    /// Cached bigrams of `title_tokens`.
    pub title_bigrams: Vec<String>,

    /// Cached bigrams of `keyword_tokens`.
    pub keyword_bigrams: Vec<String>,

    /// Cached bigrams of `body_tokens`.
    pub body_bigrams: Vec<String>,
}

impl Record {
    /// Build a record, deriving all cached token and bigram fields.
    pub fn new(
        question: String,
        body: String,
        source_file: String,
        page_number: usize,
        keywords: Vec<String>,
        is_heading_derived: bool,
    ) -> Self {
        let title_tokens = tokenize(&question);
        let keyword_tokens = tokenize(&keywords.join(" "));
        let body_tokens = tokenize(&body);
        let title_bigrams = bigrams(&title_tokens);
        let keyword_bigrams = bigrams(&keyword_tokens);
        let body_bigrams = bigrams(&body_tokens);

        Record {
            question,
            body,
            source_file,
            page_number,
            keywords,
            is_heading_derived,
            title_tokens,
            keyword_tokens,
            body_tokens,
            title_bigrams,
            keyword_bigrams,
            body_bigrams,
        }
    }
}
