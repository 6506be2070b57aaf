//! The question-answering engine: index lifecycle and query orchestration.
//!
//! [`QaEngine`] owns the current [`SearchIndex`] behind an `Arc` swap. A
//! rebuild ingests every source document, constructs the new index
//! completely, and only then replaces the reference in one store, so
//! concurrent readers always see either the complete old index or the
//! complete new one. A document that fails to ingest is logged and skipped;
//! it never aborts the rebuild or disturbs the serving index.

use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::answer::{AnswerGate, GateOutcome};
use crate::config::RehberConfig;
use crate::error::Result;
use crate::ingest::{DocumentIngester, Record, SourceDocument};
use crate::search::{RankingEngine, SearchIndex};

/// Counters reported by a completed rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Documents ingested successfully.
    pub documents: usize,

    /// Documents skipped because ingestion failed.
    pub skipped_documents: usize,

    /// Records in the new index.
    pub records: usize,
}

/// The engine owning the current index and the full ask pipeline.
pub struct QaEngine {
    ingester: DocumentIngester,
    ranker: RankingEngine,
    gate: AnswerGate,
    index: RwLock<Arc<SearchIndex>>,
}

impl QaEngine {
    /// Create an engine with a validated configuration and an empty index.
    pub fn new(config: RehberConfig) -> Result<Self> {
        config.validate()?;
        Ok(QaEngine {
            ingester: DocumentIngester::new(config.ingest),
            ranker: RankingEngine::new(config.ranking),
            gate: AnswerGate::new(config.snippet),
            index: RwLock::new(Arc::new(SearchIndex::default())),
        })
    }

    /// Rebuild the index from the given sources and swap it in atomically.
    ///
    /// Documents are ingested in parallel; each document's extraction is
    /// independent and the records are merged in source order afterwards.
    pub fn rebuild(&self, sources: &[Box<dyn SourceDocument>]) -> Result<IndexStats> {
        let per_document: Vec<Option<Vec<Record>>> = sources
            .par_iter()
            .map(|source| match self.ingester.ingest_document(source.as_ref()) {
                Ok(records) => Some(records),
                Err(error) => {
                    warn!(
                        file = source.name(),
                        error = %error,
                        "document skipped during rebuild"
                    );
                    None
                }
            })
            .collect();

        let mut stats = IndexStats::default();
        let mut records = Vec::new();
        for outcome in per_document {
            match outcome {
                Some(batch) => {
                    stats.documents += 1;
                    records.extend(batch);
                }
                None => stats.skipped_documents += 1,
            }
        }
        stats.records = records.len();

        let index = SearchIndex::build(records);
        *self.index.write() = Arc::new(index);

        info!(
            documents = stats.documents,
            skipped = stats.skipped_documents,
            records = stats.records,
            "index rebuilt"
        );
        Ok(stats)
    }

    /// Snapshot of the current index; queries run against it read-only.
    pub fn snapshot(&self) -> Arc<SearchIndex> {
        self.index.read().clone()
    }

    /// Answer a raw natural-language question against the current index.
    ///
    /// Returns the typed gate outcome; "no suitable answer" is a result,
    /// never an error. Errors mean the pipeline itself failed.
    pub fn ask(&self, raw_query: &str) -> Result<GateOutcome> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Ok(GateOutcome::NoAnswer);
        }

        let index = self.snapshot();
        let mut candidates = self.ranker.search(&index, query);
        if candidates.is_empty() {
            candidates = self.ranker.keyword_fallback(&index, query);
        }
        Ok(self.gate.gate_and_answer(&index, query, &candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RehberError;
    use crate::ingest::{PageArea, Region, WordBox};

    struct FixturePage {
        text: String,
    }

    impl PageArea for FixturePage {
        fn width(&self) -> f64 {
            612.0
        }

        fn height(&self) -> f64 {
            792.0
        }

        fn text(&self, _x_tolerance: f64, _y_tolerance: f64) -> Result<String> {
            Ok(self.text.clone())
        }

        fn region_text(
            &self,
            _region: Region,
            _x_tolerance: f64,
            _y_tolerance: f64,
        ) -> Result<String> {
            Ok(String::new())
        }

        fn words(&self) -> Result<Vec<WordBox>> {
            Ok(Vec::new())
        }
    }

    struct FixtureDocument {
        name: String,
        pages: Vec<String>,
    }

    impl SourceDocument for FixtureDocument {
        fn name(&self) -> &str {
            &self.name
        }

        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page(&self, index: usize) -> Result<Box<dyn PageArea + '_>> {
            Ok(Box::new(FixturePage {
                text: self.pages[index].clone(),
            }))
        }
    }

    struct BrokenDocument;

    impl SourceDocument for BrokenDocument {
        fn name(&self) -> &str {
            "bozuk.pdf"
        }

        fn page_count(&self) -> usize {
            1
        }

        fn page(&self, _index: usize) -> Result<Box<dyn PageArea + '_>> {
            Err(RehberError::ingest("unreadable page"))
        }
    }

    fn fixture(name: &str, pages: &[&str]) -> Box<dyn SourceDocument> {
        Box::new(FixtureDocument {
            name: name.to_string(),
            pages: pages.iter().map(|p| p.to_string()).collect(),
        })
    }

    const VIZE_PAGE: &str = "Soru: Vize sinavi ne zaman yapilir? \
        Cevap: Vize sinavi donem ortasinda akademik takvimde ilan edilen tarihte yapilir.";

    #[test]
    fn test_rebuild_and_ask() {
        let engine = QaEngine::new(RehberConfig::default()).unwrap();
        let sources = vec![fixture("takvim.pdf", &[VIZE_PAGE])];
        let stats = engine.rebuild(&sources).unwrap();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.records, 1);

        let outcome = engine.ask("vize sinavi ne zaman").unwrap();
        assert!(outcome.is_answer());
    }

    #[test]
    fn test_failing_document_is_skipped() {
        let engine = QaEngine::new(RehberConfig::default()).unwrap();
        let sources: Vec<Box<dyn SourceDocument>> =
            vec![Box::new(BrokenDocument), fixture("takvim.pdf", &[VIZE_PAGE])];
        let stats = engine.rebuild(&sources).unwrap();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.skipped_documents, 1);
        assert_eq!(stats.records, 1);
        assert!(engine.ask("vize sinavi ne zaman").unwrap().is_answer());
    }

    #[test]
    fn test_empty_query_is_no_answer() {
        let engine = QaEngine::new(RehberConfig::default()).unwrap();
        assert_eq!(engine.ask("   ").unwrap(), GateOutcome::NoAnswer);
    }

    #[test]
    fn test_rebuild_swaps_index() {
        let engine = QaEngine::new(RehberConfig::default()).unwrap();
        engine
            .rebuild(&[fixture("takvim.pdf", &[VIZE_PAGE])])
            .unwrap();
        let before = engine.snapshot();

        engine.rebuild(&[]).unwrap();
        let after = engine.snapshot();

        // The old snapshot stays fully servable; the new one is independent.
        assert_eq!(before.len(), 1);
        assert!(after.is_empty());
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RehberConfig::default();
        config.ranking.top_k = 0;
        assert!(QaEngine::new(config).is_err());
    }
}
