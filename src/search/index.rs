//! The immutable inverted/BM25 index built from ingested records.

use ahash::{AHashMap, AHashSet};

use crate::ingest::Record;

/// A record field that participates in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Keywords,
    Body,
}

/// An immutable index over a fixed, ordered set of records.
///
/// Records are referenced by position everywhere else in the pipeline. The
/// index is never mutated after construction: rebuilding produces a wholly
/// new value, and the old one stays fully servable until its holder swaps it
/// out.
#[derive(Debug, Default)]
pub struct SearchIndex {
    records: Vec<Record>,
    avg_title_len: f64,
    avg_keyword_len: f64,
    avg_body_len: f64,
    df_title: AHashMap<String, usize>,
    df_keywords: AHashMap<String, usize>,
    df_body: AHashMap<String, usize>,
    inverted: AHashMap<String, Vec<usize>>,
    vocabulary: Vec<String>,
}

impl SearchIndex {
    /// Build the index: per-field document frequencies, average field
    /// lengths, the inverted map, and the sorted vocabulary.
    pub fn build(records: Vec<Record>) -> SearchIndex {
        let total = records.len().max(1) as f64;

        let mut df_title: AHashMap<String, usize> = AHashMap::new();
        let mut df_keywords: AHashMap<String, usize> = AHashMap::new();
        let mut df_body: AHashMap<String, usize> = AHashMap::new();
        let mut inverted: AHashMap<String, Vec<usize>> = AHashMap::new();

        let mut title_len_sum = 0usize;
        let mut keyword_len_sum = 0usize;
        let mut body_len_sum = 0usize;

        for (position, record) in records.iter().enumerate() {
            title_len_sum += record.title_tokens.len();
            keyword_len_sum += record.keyword_tokens.len();
            body_len_sum += record.body_tokens.len();

            for token in unique(&record.title_tokens) {
                *df_title.entry(token.to_string()).or_insert(0) += 1;
            }
            for token in unique(&record.keyword_tokens) {
                *df_keywords.entry(token.to_string()).or_insert(0) += 1;
            }
            for token in unique(&record.body_tokens) {
                *df_body.entry(token.to_string()).or_insert(0) += 1;
            }

            let combined: AHashSet<&str> = record
                .title_tokens
                .iter()
                .chain(record.keyword_tokens.iter())
                .chain(record.body_tokens.iter())
                .map(String::as_str)
                .collect();
            for token in combined {
                // Records are visited in order, so postings stay ascending.
                inverted.entry(token.to_string()).or_default().push(position);
            }
        }

        let mut vocabulary: Vec<String> = inverted.keys().cloned().collect();
        vocabulary.sort_unstable();

        SearchIndex {
            avg_title_len: title_len_sum as f64 / total,
            avg_keyword_len: keyword_len_sum as f64 / total,
            avg_body_len: body_len_sum as f64 / total,
            records,
            df_title,
            df_keywords,
            df_body,
            inverted,
            vocabulary,
        }
    }

    /// The indexed records, in ingestion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted token vocabulary across all fields, for fuzzy lookup.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Positions of records containing the token in any field, ascending.
    pub fn postings(&self, token: &str) -> &[usize] {
        self.inverted.get(token).map_or(&[], Vec::as_slice)
    }

    /// Average token length of the given field.
    pub fn avg_len(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.avg_title_len,
            Field::Keywords => self.avg_keyword_len,
            Field::Body => self.avg_body_len,
        }
    }

    /// Field-specific document frequency of a term.
    pub fn df(&self, field: Field, term: &str) -> usize {
        let table = match field {
            Field::Title => &self.df_title,
            Field::Keywords => &self.df_keywords,
            Field::Body => &self.df_body,
        };
        table.get(term).copied().unwrap_or(0)
    }

    /// Per-field inverse document frequency:
    /// `ln(1 + (N - df + 0.5) / (df + 0.5))`.
    pub fn idf(&self, field: Field, term: &str) -> f64 {
        let total = self.records.len();
        if total == 0 {
            return 0.0;
        }
        let df = self.df(field, term) as f64;
        (1.0 + (total as f64 - df + 0.5) / (df + 0.5)).ln()
    }
}

fn unique(tokens: &[String]) -> AHashSet<&str> {
    tokens.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, body: &str, keywords: &[&str]) -> Record {
        Record::new(
            question.to_string(),
            body.to_string(),
            "test.pdf".to_string(),
            1,
            keywords.iter().map(|k| k.to_string()).collect(),
            false,
        )
    }

    fn sample_index() -> SearchIndex {
        SearchIndex::build(vec![
            record(
                "Vize sinavi",
                "Vize sinavi donem ortasinda yapilir.",
                &["vize"],
            ),
            record(
                "Final sinavi",
                "Final sinavi donem sonunda yapilir.",
                &["final"],
            ),
        ])
    }

    #[test]
    fn test_document_frequencies_are_per_field() {
        let index = sample_index();
        assert_eq!(index.df(Field::Title, "vize"), 1);
        assert_eq!(index.df(Field::Title, "sinav"), 2);
        assert_eq!(index.df(Field::Keywords, "vize"), 1);
        assert_eq!(index.df(Field::Body, "donem"), 2);
        assert_eq!(index.df(Field::Body, "yok"), 0);
    }

    #[test]
    fn test_postings_ascending_and_union_over_fields() {
        let index = sample_index();
        assert_eq!(index.postings("sinav"), &[0, 1]);
        assert_eq!(index.postings("vize"), &[0]);
        assert_eq!(index.postings("final"), &[1]);
        assert!(index.postings("bilinmeyen").is_empty());
    }

    #[test]
    fn test_vocabulary_sorted() {
        let index = sample_index();
        let vocabulary = index.vocabulary();
        assert!(vocabulary.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(vocabulary.contains(&"donem".to_string()));
    }

    #[test]
    fn test_idf_decreases_with_document_frequency() {
        let index = sample_index();
        // "vize" appears in one title, "sinav" in both.
        assert!(index.idf(Field::Title, "vize") > index.idf(Field::Title, "sinav"));
        assert!(index.idf(Field::Title, "sinav") > 0.0);
    }

    #[test]
    fn test_empty_index() {
        let index = SearchIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.idf(Field::Body, "vize"), 0.0);
        assert!(index.vocabulary().is_empty());
    }
}
