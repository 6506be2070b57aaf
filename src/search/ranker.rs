//! Per-field BM25 scoring with phrase, intent, and prefix boosting.

use std::cmp::Ordering;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::{bigrams, tokenize};
use crate::config::RankingConfig;
use crate::ingest::Record;
use crate::query::expand::{ExpandedQuery, QueryExpander};
use crate::query::fuzzy::close_matches;
use crate::query::lexicon::resolve_alias;
use crate::search::index::{Field, SearchIndex};

/// Cap on the bigram hits and the title/keyword intersection bonuses.
const OVERLAP_BONUS_CAP: usize = 3;

/// Increment per bigram or intersection hit under the cap.
const OVERLAP_BONUS_STEP: f64 = 0.02;

/// Base multiplier for title/keyword intersection bonuses.
const OVERLAP_BONUS_BASE: f64 = 1.05;

/// Multiplier when the full expanded phrase occurs verbatim in a field.
const PHRASE_BONUS: f64 = 1.15;

/// Pass-grade intent multipliers: both exam terms, digit token, percent token.
const EXAM_PAIR_BONUS: f64 = 1.20;
const DIGIT_BONUS: f64 = 1.08;
const PERCENT_BONUS: f64 = 1.06;

/// Penalty for appeal-domain records when the query carries no appeal intent.
const APPEAL_PENALTY: f64 = 0.55;

/// Bonus for heading-derived records.
const HEADING_BONUS: f64 = 1.05;

/// Extra multiplicative boost layered onto prefix-matched records.
const PREFIX_BOOST: f64 = 0.15;

/// Maximum raw token length for the short-query prefix pass.
const SHORT_QUERY_LEN: usize = 4;

/// Base weight of a prefix-matched record; heading-derived records rank first
/// inside the marker set.
const PREFIX_BASE_WEIGHT: f64 = 1.0;
const PREFIX_HEADING_WEIGHT: f64 = 0.2;

/// Zero-candidate fallback weights.
const FALLBACK_EXACT_WEIGHT: f64 = 1.0;
const FALLBACK_FUZZY_WEIGHT: f64 = 0.6;
const FALLBACK_HEADING_BONUS: f64 = 0.5;
const FALLBACK_FUZZY_CUTOFF: f64 = 0.8;
const FALLBACK_FUZZY_LIMIT: usize = 5;

/// A ranked candidate referencing a record by its index position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Position of the record in the index.
    pub position: usize,

    /// Combined relevance score.
    pub score: f64,
}

/// Scores expanded queries against a [`SearchIndex`].
#[derive(Debug, Clone)]
pub struct RankingEngine {
    config: RankingConfig,
    expander: QueryExpander,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        RankingEngine {
            config,
            expander: QueryExpander::new(),
        }
    }

    /// Rank the index against a raw query: expansion, per-record scoring,
    /// the short-query prefix boost, and stable top-k selection.
    pub fn search(&self, index: &SearchIndex, raw_query: &str) -> Vec<Candidate> {
        let expanded = self.expander.expand(raw_query, index.vocabulary());
        if expanded.terms.is_empty() {
            return Vec::new();
        }

        let query_bigrams = bigrams(&expanded.terms);
        let prefix_marked = self.prefix_candidates(index, &expanded.raw_tokens);

        let mut candidates: Vec<Candidate> = Vec::new();
        for (position, record) in index.records().iter().enumerate() {
            let mut score = self.score_record(index, record, &expanded, &query_bigrams);
            if score > 0.0 {
                if prefix_marked.contains(&position) {
                    score *= 1.0 + PREFIX_BOOST;
                }
                candidates.push(Candidate { position, score });
            }
        }

        sort_descending(&mut candidates);
        candidates.truncate(self.config.top_k);
        candidates
    }

    /// Inverted-index union fallback for queries where BM25 scores nothing:
    /// exact token matches weigh 1.0, fuzzy-similar tokens 0.6, plus a flat
    /// heading bonus.
    pub fn keyword_fallback(&self, index: &SearchIndex, raw_query: &str) -> Vec<Candidate> {
        let raw_tokens: AHashSet<String> = tokenize(raw_query).into_iter().collect();
        if raw_tokens.is_empty() {
            return Vec::new();
        }

        let mut weights: AHashMap<usize, f64> = AHashMap::new();
        for token in &raw_tokens {
            for &position in index.postings(token) {
                *weights.entry(position).or_insert(0.0) += FALLBACK_EXACT_WEIGHT;
            }
        }
        for token in &raw_tokens {
            for similar in close_matches(
                token,
                index.vocabulary(),
                FALLBACK_FUZZY_LIMIT,
                FALLBACK_FUZZY_CUTOFF,
            ) {
                for &position in index.postings(&similar) {
                    *weights.entry(position).or_insert(0.0) += FALLBACK_FUZZY_WEIGHT;
                }
            }
        }

        let mut candidates: Vec<Candidate> = weights
            .into_iter()
            .map(|(position, weight)| {
                let bonus = if index.records()[position].is_heading_derived {
                    FALLBACK_HEADING_BONUS
                } else {
                    0.0
                };
                Candidate {
                    position,
                    score: weight + bonus,
                }
            })
            .collect();

        sort_descending(&mut candidates);
        candidates.truncate(self.config.top_k);
        candidates
    }

    /// Combined score for one record against the expanded query.
    fn score_record(
        &self,
        index: &SearchIndex,
        record: &Record,
        expanded: &ExpandedQuery,
        query_bigrams: &[String],
    ) -> f64 {
        let config = &self.config;
        let mut score = config.title_weight
            * self.bm25_field(index, Field::Title, &expanded.terms, &record.title_tokens)
            + config.keyword_weight
                * self.bm25_field(index, Field::Keywords, &expanded.terms, &record.keyword_tokens)
            + config.body_weight
                * self.bm25_field(index, Field::Body, &expanded.terms, &record.body_tokens);

        if !query_bigrams.is_empty() {
            let record_bigrams: AHashSet<&str> = record
                .title_bigrams
                .iter()
                .chain(record.keyword_bigrams.iter())
                .chain(record.body_bigrams.iter())
                .map(String::as_str)
                .collect();
            let distinct: AHashSet<&str> = query_bigrams.iter().map(String::as_str).collect();
            let hits = distinct
                .iter()
                .filter(|bigram| record_bigrams.contains(*bigram))
                .count();
            if hits > 0 {
                score *= config.bigram_weight
                    + OVERLAP_BONUS_STEP * hits.min(OVERLAP_BONUS_CAP) as f64;
            }
        }

        let term_set: AHashSet<&str> = expanded.terms.iter().map(String::as_str).collect();
        let title_hits = intersection_size(&term_set, &record.title_tokens);
        let keyword_hits = intersection_size(&term_set, &record.keyword_tokens);
        if title_hits > 0 {
            score *= OVERLAP_BONUS_BASE
                + OVERLAP_BONUS_STEP * title_hits.min(OVERLAP_BONUS_CAP) as f64;
        }
        if keyword_hits > 0 {
            score *= OVERLAP_BONUS_BASE
                + OVERLAP_BONUS_STEP * keyword_hits.min(OVERLAP_BONUS_CAP) as f64;
        }

        let phrase = expanded.terms.join(" ");
        if !phrase.is_empty()
            && (record.title_tokens.join(" ").contains(&phrase)
                || record.body_tokens.join(" ").contains(&phrase))
        {
            score *= PHRASE_BONUS;
        }

        if expanded.intents.pass_grade {
            let body: AHashSet<&str> = record.body_tokens.iter().map(String::as_str).collect();
            if body.contains("final") && body.contains("vize") {
                score *= EXAM_PAIR_BONUS;
            }
            if record
                .body_tokens
                .iter()
                .any(|token| token.chars().all(|ch| ch.is_ascii_digit()))
            {
                score *= DIGIT_BONUS;
            }
            if record.body_tokens.iter().any(|token| token.contains('%')) {
                score *= PERCENT_BONUS;
            }
        }

        if !expanded.intents.appeal
            && [
                &record.body_tokens,
                &record.keyword_tokens,
                &record.title_tokens,
            ]
            .iter()
            .any(|tokens| tokens.iter().any(|token| token == "itiraz"))
        {
            score *= APPEAL_PENALTY;
        }

        if record.is_heading_derived {
            score *= HEADING_BONUS;
        }

        score
    }

    /// BM25 over one field with the index's field statistics.
    fn bm25_field(
        &self,
        index: &SearchIndex,
        field: Field,
        query_terms: &[String],
        doc_tokens: &[String],
    ) -> f64 {
        if query_terms.is_empty() || doc_tokens.is_empty() {
            return 0.0;
        }

        let doc_len = doc_tokens.len() as f64;
        let avg_len = index.avg_len(field).max(1.0);

        let mut term_freq: AHashMap<&str, usize> = AHashMap::new();
        for token in doc_tokens {
            *term_freq.entry(token.as_str()).or_insert(0) += 1;
        }

        let k1 = self.config.k1;
        let b = self.config.b;
        let mut score = 0.0;
        for term in query_terms {
            let freq = term_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
            if freq == 0.0 {
                continue;
            }
            let idf = index.idf(field, term);
            score += idf * (freq * (k1 + 1.0))
                / (freq + k1 * (1.0 - b + b * (doc_len / avg_len)));
        }
        score
    }

    /// Prefix pass for short single-token queries: mark up to top-k records
    /// whose title or keyword tokens share a prefix with the alias-resolved
    /// query token.
    fn prefix_candidates(&self, index: &SearchIndex, raw_tokens: &[String]) -> AHashSet<usize> {
        let [key] = raw_tokens else {
            return AHashSet::new();
        };
        if key.chars().count() > SHORT_QUERY_LEN {
            return AHashSet::new();
        }
        let prefix = resolve_alias(key).unwrap_or(key.as_str());
        if prefix.len() < 2 {
            return AHashSet::new();
        }

        let mut marked: Vec<(f64, usize)> = Vec::new();
        for (position, record) in index.records().iter().enumerate() {
            let hit = record
                .title_tokens
                .iter()
                .chain(record.keyword_tokens.iter())
                .any(|token| token.starts_with(prefix));
            if hit {
                let weight = PREFIX_BASE_WEIGHT
                    + if record.is_heading_derived {
                        PREFIX_HEADING_WEIGHT
                    } else {
                        0.0
                    };
                marked.push((weight, position));
            }
        }

        marked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        marked.truncate(self.config.top_k);
        marked.into_iter().map(|(_, position)| position).collect()
    }
}

/// Descending by score; ties keep ascending record position, so ranked order
/// is stable across rebuilds of the same corpus.
fn sort_descending(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.position.cmp(&b.position))
    });
}

fn intersection_size(terms: &AHashSet<&str>, tokens: &[String]) -> usize {
    let token_set: AHashSet<&str> = tokens.iter().map(String::as_str).collect();
    token_set
        .iter()
        .filter(|token| terms.contains(*token))
        .count()
}
