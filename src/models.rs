//! Data models for downloaded articles and run reporting.
//!
//! This module defines the two structures that cross module boundaries:
//! - [`Article`]: one extracted newspaper article, the unit persisted to disk
//! - [`CrawlSummary`]: end-of-run tallies reported to the operator

use serde::{Deserialize, Serialize};

/// One article extracted from a People's Daily issue page.
///
/// Produced by the content extractor and consumed only by the
/// persistence layer; never mutated after construction. Every record
/// that reaches disk has non-empty `content` — pages whose content
/// container is missing or holds no paragraph text are discarded
/// upstream instead of producing an empty record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// The absolute URL the article was downloaded from.
    pub url: String,
    /// Newline-joined headings (h3/h1/h2 priority order), edge-trimmed.
    pub title: String,
    /// Newline-joined paragraph texts of the article body, edge-trimmed.
    pub content: String,
}

/// Tallies accumulated over one crawl run.
///
/// Reported at the end of the run so an operator can re-run specific
/// date ranges by hand without the tool aborting mid-range on the
/// first bad day.
#[derive(Debug, Default)]
pub struct CrawlSummary {
    /// Articles successfully extracted and handed to persistence.
    pub total_articles: usize,
    /// Monthly JSON files written.
    pub files_written: usize,
    /// Days that produced at least one article.
    pub success_days: usize,
    /// Days that produced none (missing issue, layout mismatch, or error).
    pub empty_days: usize,
    /// `YYYY/MM/DD` labels of the empty days, in crawl order.
    pub failed_days: Vec<String>,
}
