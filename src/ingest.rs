//! Document ingestion: page text extraction and record construction.
//!
//! The document layer (a PDF reader or any other page-oriented source) is
//! reached only through the [`SourceDocument`] and [`PageArea`] traits, so
//! ingestion can run against real documents and in-memory fixtures alike.
//! Extraction degrades through ordered fallback cascades at both the page
//! level and the record level; a strategy failure never propagates as an
//! error, it just hands over to the next strategy.

pub mod extractor;
pub mod page;
pub mod record;

pub use extractor::DocumentIngester;
pub use page::{PageArea, Region, SourceDocument, WordBox, page_text_with_fallback};
pub use record::Record;
