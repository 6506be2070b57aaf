//! Document-layer interfaces and the page-text fallback cascade.
//!
//! A page is read through up to three layout strategies in strict order:
//! whole-page linear extraction, two-column extraction with a central gutter,
//! and line reconstruction from word bounding boxes. The first strategy whose
//! output meets the length threshold wins; when all fall short, whatever
//! partial text the strategies produced is used, in the same preference
//! order. Strategy errors count as empty output and never propagate.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::analysis::clean_page_text;
use crate::error::Result;

/// A single word with its bounding box on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct WordBox {
    /// Horizontal start of the word.
    pub x0: f64,
    /// Vertical top of the word.
    pub top: f64,
    /// Vertical bottom of the word.
    pub bottom: f64,
    /// The word text.
    pub text: String,
}

/// A rectangular region of a page, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

/// One page of a source document.
pub trait PageArea: Send + Sync {
    /// Page width in page units.
    fn width(&self) -> f64;

    /// Page height in page units.
    fn height(&self) -> f64;

    /// Extract the whole page text at the given glyph-clustering tolerances.
    fn text(&self, x_tolerance: f64, y_tolerance: f64) -> Result<String>;

    /// Extract text restricted to a rectangular region.
    fn region_text(&self, region: Region, x_tolerance: f64, y_tolerance: f64) -> Result<String>;

    /// Per-word bounding boxes for the whole page.
    fn words(&self) -> Result<Vec<WordBox>>;
}

/// A multi-page source document.
pub trait SourceDocument: Send + Sync {
    /// Document name, used for provenance and logging.
    fn name(&self) -> &str;

    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Open one page by zero-based index.
    fn page(&self, index: usize) -> Result<Box<dyn PageArea + '_>>;
}

/// Minimum cleaned length for the layout-based strategies.
const MIN_LAYOUT_LEN: usize = 60;

/// Minimum cleaned length for line reconstruction from word boxes.
const MIN_LINE_LEN: usize = 40;

/// Share of page height treated as header/footer by line reconstruction.
const HEADER_FOOTER_RATIO: f64 = 0.08;

/// Gutter and page-edge margin share used by two-column extraction.
const EDGE_RATIO: f64 = 0.06;

/// Extract cleaned page text through the fallback cascade.
pub fn page_text_with_fallback(page: &dyn PageArea) -> String {
    let single = extract_single_column(page);
    if single.chars().count() >= MIN_LAYOUT_LEN {
        return single;
    }

    let two_col = extract_two_columns(page);
    if two_col.chars().count() >= MIN_LAYOUT_LEN {
        return two_col;
    }

    let built = assemble_lines(page);
    if built.chars().count() >= MIN_LINE_LEN {
        return built;
    }

    if !single.is_empty() {
        single
    } else if !two_col.is_empty() {
        two_col
    } else {
        built
    }
}

/// Whole-page linear extraction with moderate tolerances.
fn extract_single_column(page: &dyn PageArea) -> String {
    let raw = match page.text(2.0, 1.5) {
        Ok(text) => text,
        Err(err) => {
            debug!("whole-page extraction failed: {err}");
            String::new()
        }
    };
    clean_page_text(&raw)
}

/// Crop to left/right halves with a central gutter and page-edge margins,
/// read each half, and concatenate left then right.
fn extract_two_columns(page: &dyn PageArea) -> String {
    let width = page.width();
    let height = page.height();
    let gutter = width * EDGE_RATIO;
    let margin_x = width * EDGE_RATIO;
    let margin_y = height * EDGE_RATIO;

    let left = Region {
        x0: margin_x,
        top: margin_y,
        x1: width / 2.0 - gutter,
        bottom: height - margin_y,
    };
    let right = Region {
        x0: width / 2.0 + gutter,
        top: margin_y,
        x1: width - margin_x,
        bottom: height - margin_y,
    };

    let halves: Vec<String> = [left, right]
        .into_iter()
        .map(|region| {
            let raw = match page.region_text(region, 2.2, 1.6) {
                Ok(text) => text,
                Err(err) => {
                    debug!("two-column extraction failed: {err}");
                    String::new()
                }
            };
            clean_page_text(&raw)
        })
        .filter(|half| !half.is_empty())
        .collect();

    halves.join("\n").trim().to_string()
}

/// Rebuild lines from word bounding boxes, excluding header/footer bands.
fn assemble_lines(page: &dyn PageArea) -> String {
    let words = match page.words() {
        Ok(words) => words,
        Err(err) => {
            debug!("word-box extraction failed: {err}");
            return String::new();
        }
    };
    if words.is_empty() {
        return String::new();
    }

    let height = page.height();
    let top_cut = height * HEADER_FOOTER_RATIO;
    let bottom_cut = height * (1.0 - HEADER_FOOTER_RATIO);

    // Rows keyed by vertical position quantized to tenths of half a unit.
    let mut rows: BTreeMap<i64, Vec<&WordBox>> = BTreeMap::new();
    for word in &words {
        if word.top < top_cut || word.bottom > bottom_cut {
            continue;
        }
        let key = (word.top / 2.0 * 10.0).round() as i64;
        rows.entry(key).or_default().push(word);
    }

    let mut lines = Vec::new();
    for row in rows.values_mut() {
        row.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));
        let line = row
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    clean_page_text(&lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RehberError;

    /// Page stub with controllable outputs per strategy.
    struct StubPage {
        whole: Result<String>,
        region: Result<String>,
        words: Result<Vec<WordBox>>,
    }

    impl StubPage {
        fn new(whole: &str, region: &str, words: Vec<WordBox>) -> Self {
            StubPage {
                whole: Ok(whole.to_string()),
                region: Ok(region.to_string()),
                words: Ok(words),
            }
        }
    }

    impl PageArea for StubPage {
        fn width(&self) -> f64 {
            612.0
        }

        fn height(&self) -> f64 {
            792.0
        }

        fn text(&self, _x_tolerance: f64, _y_tolerance: f64) -> Result<String> {
            match &self.whole {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(RehberError::ingest("whole-page read failed")),
            }
        }

        fn region_text(
            &self,
            _region: Region,
            _x_tolerance: f64,
            _y_tolerance: f64,
        ) -> Result<String> {
            match &self.region {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(RehberError::ingest("region read failed")),
            }
        }

        fn words(&self) -> Result<Vec<WordBox>> {
            match &self.words {
                Ok(words) => Ok(words.clone()),
                Err(_) => Err(RehberError::ingest("word read failed")),
            }
        }
    }

    fn word(x0: f64, top: f64, text: &str) -> WordBox {
        WordBox {
            x0,
            top,
            bottom: top + 10.0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_single_column_wins_when_long_enough() {
        let long = "Bu sayfa tek sutunlu bir duzen icerir ve yeterince uzun bir metne sahiptir.";
        let page = StubPage::new(long, "ignored", Vec::new());
        assert_eq!(page_text_with_fallback(&page), long);
    }

    #[test]
    fn test_two_column_fallback() {
        let half = "Sol sutunda yer alan metin yeterince uzun oldugunda kabul edilir burada.";
        let page = StubPage::new("kisa", half, Vec::new());
        // Both halves return the same stub text, joined left then right.
        let expected = format!("{half}\n{half}");
        assert_eq!(page_text_with_fallback(&page), expected);
    }

    #[test]
    fn test_word_box_line_reconstruction() {
        let words = vec![
            // Header band, excluded (top < 8% of 792 = 63.36).
            word(10.0, 20.0, "UNIVERSITE"),
            // First row, out of order horizontally.
            word(120.0, 100.0, "ikinci"),
            word(10.0, 100.0, "birinci"),
            // Second row.
            word(10.0, 140.0, "ucuncu"),
            // Footer band, excluded (bottom > 92% of 792 = 728.64).
            word(10.0, 760.0, "sayfa"),
        ];
        let page = StubPage::new("", "", words);
        let built = assemble_lines(&page);
        assert_eq!(built, "birinci ikinci ucuncu");
    }

    #[test]
    fn test_partial_text_preference_order() {
        // All strategies fall short; the single-column partial wins.
        let page = StubPage::new("kisa metin", "daha kisa", Vec::new());
        assert_eq!(page_text_with_fallback(&page), "kisa metin");
    }

    #[test]
    fn test_strategy_errors_degrade_to_empty() {
        let page = StubPage {
            whole: Err(RehberError::ingest("broken")),
            region: Err(RehberError::ingest("broken")),
            words: Err(RehberError::ingest("broken")),
        };
        assert_eq!(page_text_with_fallback(&page), "");
    }
}
