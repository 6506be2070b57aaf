//! Configuration for the ingestion, ranking, and snippet stages.

use serde::{Deserialize, Serialize};

use crate::error::{RehberError, Result};

/// Configuration for the ranking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// K1 parameter for BM25 (term frequency saturation).
    pub k1: f64,

    /// B parameter for BM25 (field length normalization).
    pub b: f64,

    /// Weight of the title field BM25 score.
    pub title_weight: f64,

    /// Weight of the keyword field BM25 score.
    pub keyword_weight: f64,

    /// Weight of the body field BM25 score.
    pub body_weight: f64,

    /// Base multiplier applied when expanded-query bigrams overlap a record.
    pub bigram_weight: f64,

    /// Number of candidates returned by a search.
    pub top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            k1: 1.5,
            b: 0.75,
            title_weight: 1.35,
            keyword_weight: 1.20,
            body_weight: 1.00,
            bigram_weight: 1.15,
            top_k: 5,
        }
    }
}

/// Configuration for snippet extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetConfig {
    /// Character budget for an answer snippet.
    pub max_chars: usize,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        SnippetConfig { max_chars: 480 }
    }
}

/// Configuration for document ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Minimum body length (in characters) for an extracted record.
    pub min_body_len: usize,

    /// Maximum number of keywords kept per record.
    pub max_keywords: usize,

    /// Number of leading sentences used by the last-resort page record.
    pub fallback_sentences: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            min_body_len: 25,
            max_keywords: 12,
            fallback_sentences: 2,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RehberConfig {
    pub ranking: RankingConfig,
    pub snippet: SnippetConfig,
    pub ingest: IngestConfig,
}

impl RehberConfig {
    /// Check that every parameter is usable before the engine starts.
    pub fn validate(&self) -> Result<()> {
        if self.ranking.k1 <= 0.0 {
            return Err(RehberError::invalid_config("ranking.k1 must be positive"));
        }
        if !(0.0..=1.0).contains(&self.ranking.b) {
            return Err(RehberError::invalid_config("ranking.b must be within [0, 1]"));
        }
        if self.ranking.title_weight <= 0.0
            || self.ranking.keyword_weight <= 0.0
            || self.ranking.body_weight <= 0.0
            || self.ranking.bigram_weight <= 0.0
        {
            return Err(RehberError::invalid_config(
                "ranking field weights must be positive",
            ));
        }
        if self.ranking.top_k == 0 {
            return Err(RehberError::invalid_config("ranking.top_k must be at least 1"));
        }
        if self.snippet.max_chars == 0 {
            return Err(RehberError::invalid_config(
                "snippet.max_chars must be at least 1",
            ));
        }
        if self.ingest.min_body_len == 0 || self.ingest.max_keywords == 0 {
            return Err(RehberError::invalid_config(
                "ingest thresholds must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RehberConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_top_k_rejected() {
        let mut config = RehberConfig::default();
        config.ranking.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_b_rejected() {
        let mut config = RehberConfig::default();
        config.ranking.b = 1.5;
        assert!(config.validate().is_err());
    }
}
