//! Record extraction from cleaned page text.
//!
//! Per page, three strategies run in strict order: explicit question/answer
//! block matching, heading-delimited chunking, and a last-resort sentence
//! window that guarantees at least one record per non-empty page. After all
//! pages of a document are processed, an enrichment pass derives keywords for
//! records that carry none and injects curated domain aliases.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::analysis::{clean_page_text, fold_lower, split_sentences, tokenize};
use crate::config::IngestConfig;
use crate::error::Result;
use crate::ingest::page::{PageArea, SourceDocument, page_text_with_fallback};
use crate::ingest::record::Record;

/// Explicit "Soru / Cevap / Anahtar Kelimeler" block, case-insensitive,
/// dot-matches-newline. Applied to the page text with a trailing `---`
/// sentinel so the last block terminates.
static QA_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(Soru\s*[:\-]\s*)(.+?)(?:Cevap\s*[:\-]\s*)(.+?)(?:Anahtar(?:\s*Kelimeler)?\s*[:\-]\s*(.+?))?(?:(?:---)|$)",
    )
    .unwrap()
});

static KEYWORD_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;/|]").unwrap());

/// Numbered regulation section, e.g. "Madde 12".
static SECTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Madde\s+\d+").unwrap());

/// Glyph-clustering tolerances for the plain line-oriented page read used by
/// heading chunking.
const LINE_READ_TOLERANCES: (f64, f64) = (3.0, 3.0);

/// Maximum title length for the last-resort page record.
const FALLBACK_TITLE_LEN: usize = 80;

/// Default title when the last-resort page record has no leading clause.
const FALLBACK_TITLE: &str = "Genel Hukum";

/// A record in progress: extraction and enrichment work on drafts, and the
/// cached analysis fields are derived once when the draft becomes a
/// [`Record`].
#[derive(Debug)]
struct Draft {
    question: String,
    body: String,
    page_number: usize,
    keywords: Vec<String>,
    is_heading_derived: bool,
}

impl Draft {
    fn into_record(self, source_file: &str) -> Record {
        Record::new(
            self.question,
            self.body,
            source_file.to_string(),
            self.page_number,
            self.keywords,
            self.is_heading_derived,
        )
    }
}

/// Extracts structured records from the pages of a source document.
#[derive(Debug, Clone)]
pub struct DocumentIngester {
    config: IngestConfig,
}

impl DocumentIngester {
    /// Create an ingester with the given thresholds.
    pub fn new(config: IngestConfig) -> Self {
        DocumentIngester { config }
    }

    /// Extract all records from one document.
    ///
    /// Empty pages are skipped; every non-empty page yields at least one
    /// record through the extraction cascade.
    pub fn ingest_document(&self, document: &dyn SourceDocument) -> Result<Vec<Record>> {
        let mut drafts = Vec::new();

        for page_index in 0..document.page_count() {
            let page = document.page(page_index)?;
            let page_number = page_index + 1;

            let text = page_text_with_fallback(page.as_ref());
            if text.is_empty() {
                debug!(
                    file = document.name(),
                    page = page_number,
                    "empty page skipped"
                );
                continue;
            }

            let mut produced = self.extract_qa_blocks(&text, page_number);
            if produced.is_empty() {
                produced = self.extract_heading_chunks(page.as_ref(), page_number);
            }
            if produced.is_empty() {
                produced.push(self.fallback_record(&text, page_number));
            }
            drafts.extend(produced);
        }

        self.enrich(&mut drafts);

        let name = document.name();
        Ok(drafts
            .into_iter()
            .map(|draft| draft.into_record(name))
            .collect())
    }

    /// Strategy 1: explicit question/answer blocks.
    fn extract_qa_blocks(&self, text: &str, page_number: usize) -> Vec<Draft> {
        let haystack = format!("{text} ---");
        let mut drafts = Vec::new();

        for caps in QA_BLOCK_RE.captures_iter(&haystack) {
            let question = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            let body = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");
            if question.is_empty() || body.chars().count() < self.config.min_body_len {
                continue;
            }

            let keyword_line = caps.get(4).map(|m| m.as_str()).unwrap_or("");
            let keywords: Vec<String> = KEYWORD_SPLIT_RE
                .split(keyword_line)
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .take(self.config.max_keywords)
                .map(str::to_string)
                .collect();

            drafts.push(Draft {
                question: question.to_string(),
                body: body.to_string(),
                page_number,
                keywords,
                is_heading_derived: false,
            });
        }

        drafts
    }

    /// Strategy 2: heading-delimited chunks over the page's line text.
    fn extract_heading_chunks(&self, page: &dyn PageArea, page_number: usize) -> Vec<Draft> {
        let (x_tolerance, y_tolerance) = LINE_READ_TOLERANCES;
        let line_text = page.text(x_tolerance, y_tolerance).unwrap_or_default();
        let lines: Vec<&str> = line_text.lines().map(str::trim).collect();

        let mut chunks: Vec<Vec<&str>> = Vec::new();
        let mut buffer: Vec<&str> = Vec::new();
        for line in lines {
            if is_heading(line) && !buffer.is_empty() {
                chunks.push(std::mem::take(&mut buffer));
            }
            buffer.push(line);
        }
        if !buffer.is_empty() {
            chunks.push(buffer);
        }

        let mut drafts = Vec::new();
        for chunk in chunks {
            let parts: Vec<&str> = chunk.into_iter().filter(|line| !line.is_empty()).collect();
            let Some((&head, rest)) = parts.split_first() else {
                continue;
            };
            let body = clean_page_text(&rest.join(" "));
            if is_heading(head) && body.chars().count() >= self.config.min_body_len {
                drafts.push(Draft {
                    question: head.trim_end_matches(':').trim().to_string(),
                    body,
                    page_number,
                    keywords: Vec::new(),
                    is_heading_derived: true,
                });
            }
        }

        drafts
    }

    /// Strategy 3: exactly one record from the leading sentences of the page.
    fn fallback_record(&self, text: &str, page_number: usize) -> Draft {
        let sentences = split_sentences(text);
        let window = if sentences.is_empty() {
            text.to_string()
        } else {
            let take = self.config.fallback_sentences.min(sentences.len());
            sentences[..take].join(" ")
        };
        let window = if window.chars().count() < self.config.min_body_len {
            text.to_string()
        } else {
            window
        };

        let clause = window
            .split(['.', '!', '?'])
            .next()
            .unwrap_or("")
            .trim();
        let title = if clause.is_empty() { FALLBACK_TITLE } else { clause };
        let title = if title.chars().count() > FALLBACK_TITLE_LEN {
            let prefix: String = title.chars().take(FALLBACK_TITLE_LEN).collect();
            format!("{prefix}...")
        } else {
            title.to_string()
        };

        Draft {
            question: title,
            body: clean_page_text(&window),
            page_number,
            keywords: Vec::new(),
            is_heading_derived: false,
        }
    }

    /// Derive keywords for records that carry none and inject curated domain
    /// aliases, deduplicated and capped.
    fn enrich(&self, drafts: &mut [Draft]) {
        for draft in drafts.iter_mut() {
            if draft.keywords.is_empty() {
                draft.keywords = frequent_body_keywords(&draft.body, self.config.max_keywords);
            }

            let flat = fold_lower(&format!("{} {}", draft.question, draft.body));
            let mut aliases: Vec<&str> = Vec::new();
            if flat.contains("butunleme") || flat.contains("telafi") {
                aliases.extend(["but", "butunleme", "butunleme sinavi", "butun"]);
            }
            if flat.contains("transkript") || flat.contains("not belgesi") {
                aliases.extend(["trans", "transkript", "not belgesi"]);
            }
            if flat.contains("obs") || flat.contains("ogrenci otomasyon") {
                aliases.extend(["obs", "ogrenci otomasyon", "ogrenci bilgi sistemi"]);
            }
            draft
                .keywords
                .extend(aliases.into_iter().map(fold_lower));

            let mut seen = std::collections::HashSet::new();
            draft.keywords.retain(|keyword| seen.insert(keyword.clone()));
            draft.keywords.truncate(self.config.max_keywords);
        }
    }
}

/// A line counts as a heading when it is fully upper-case and at least six
/// characters long, ends with a colon, or opens a numbered section.
fn is_heading(line: &str) -> bool {
    let raw = line.trim();
    if raw.is_empty() {
        return false;
    }
    let has_letters = raw.chars().any(char::is_alphabetic);
    if has_letters && !raw.chars().any(char::is_lowercase) && raw.chars().count() >= 6 {
        return true;
    }
    if raw.ends_with(':') {
        return true;
    }
    SECTION_HEADING_RE.is_match(raw)
}

/// Up to `cap` most frequent body tokens longer than one character, ties
/// broken by first occurrence.
fn frequent_body_keywords(body: &str, cap: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for token in tokenize(body) {
        if token.chars().count() <= 1 {
            continue;
        }
        if !counts.contains_key(&token) {
            order.push(token.clone());
        }
        *counts.entry(token).or_insert(0) += 1;
    }
    order.sort_by_key(|token| Reverse(counts[token]));
    order.truncate(cap);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingester() -> DocumentIngester {
        DocumentIngester::new(IngestConfig::default())
    }

    #[test]
    fn test_qa_block_extraction() {
        let text = "Soru: Butunleme sinavina kimler girebilir? \
                    Cevap: Final sinavinda basarisiz olan ogrenciler butunleme sinavina girebilir. \
                    Anahtar Kelimeler: butunleme, final, sinav --- \
                    Soru: Vize orani nedir? \
                    Cevap: Vize notunun basari notuna etkisi yuzde kirktir ve her donem uygulanir.";
        let drafts = ingester().extract_qa_blocks(text, 2);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].question, "Butunleme sinavina kimler girebilir?");
        assert_eq!(drafts[0].keywords, vec!["butunleme", "final", "sinav"]);
        assert_eq!(drafts[0].page_number, 2);
        assert!(!drafts[0].is_heading_derived);
        assert_eq!(drafts[1].question, "Vize orani nedir?");
        assert!(drafts[1].keywords.is_empty());
    }

    #[test]
    fn test_qa_block_short_answer_rejected() {
        let text = "Soru: Kisa soru? Cevap: Cok kisa.";
        assert!(ingester().extract_qa_blocks(text, 1).is_empty());
    }

    #[test]
    fn test_is_heading() {
        assert!(is_heading("GENEL HUKUMLER"));
        assert!(is_heading("Kayit Yenileme:"));
        assert!(is_heading("Madde 12 - Sinavlar"));
        assert!(is_heading("madde 3"));
        assert!(!is_heading("KISA"));
        assert!(!is_heading("normal bir satir"));
        assert!(!is_heading(""));
    }

    #[test]
    fn test_fallback_record_uses_leading_sentences() {
        let text = "Ogrenciler her donem kayit yenilemek zorundadir. \
                    Kayit yenileme tarihleri akademik takvimde ilan edilir. \
                    Bu cumle pencereye girmez.";
        let draft = ingester().fallback_record(text, 4);
        assert_eq!(
            draft.question,
            "Ogrenciler her donem kayit yenilemek zorundadir"
        );
        assert!(draft.body.contains("kayit yenilemek zorundadir"));
        assert!(draft.body.contains("akademik takvimde ilan edilir"));
        assert!(!draft.body.contains("pencereye girmez"));
        assert_eq!(draft.page_number, 4);
    }

    #[test]
    fn test_fallback_record_truncates_long_title() {
        let long_clause = "a".repeat(120);
        let text = format!("{long_clause}. Ikinci cumle burada yer alir ve devam eder.");
        let draft = ingester().fallback_record(&text, 1);
        assert_eq!(draft.question.chars().count(), FALLBACK_TITLE_LEN + 3);
        assert!(draft.question.ends_with("..."));
    }

    #[test]
    fn test_enrich_derives_keywords_from_body() {
        let mut drafts = vec![Draft {
            question: "Devamsizlik".to_string(),
            body: "Devamsizlik siniri asilirsa ogrenci sinava giremez. \
                   Devamsizlik durumu her ders icin ayri izlenir."
                .to_string(),
            page_number: 1,
            keywords: Vec::new(),
            is_heading_derived: true,
        }];
        ingester().enrich(&mut drafts);
        // "devamsizlik" occurs twice, so it leads the derived keywords.
        assert_eq!(drafts[0].keywords[0], "devamsizlik");
        assert!(drafts[0].keywords.len() <= 12);
    }

    #[test]
    fn test_enrich_injects_domain_aliases() {
        let mut drafts = vec![Draft {
            question: "Butunleme sinavi".to_string(),
            body: "Telafi sinavi donem sonunda yapilir ve tarihleri ilan edilir.".to_string(),
            page_number: 1,
            keywords: vec!["sinav".to_string()],
            is_heading_derived: false,
        }];
        ingester().enrich(&mut drafts);
        assert!(drafts[0].keywords.contains(&"but".to_string()));
        assert!(drafts[0].keywords.contains(&"butunleme sinavi".to_string()));
        // Existing keywords stay first and duplicates are dropped.
        assert_eq!(drafts[0].keywords[0], "sinav");
    }
}
