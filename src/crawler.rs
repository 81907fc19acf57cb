//! The crawl loop: dates → sections → articles → monthly batches.
//!
//! The orchestrator walks the planned date sequence strictly in order,
//! one HTTP request in flight at a time, and accumulates extracted
//! articles in a map keyed by month. Because days arrive in ascending
//! order, a month's articles are complete as soon as the month key
//! changes; the finished month is flushed to disk and dropped from
//! memory right there, bounding peak memory to roughly one month of
//! articles. A final pass flushes whatever remains, in the same
//! chronological order the batches were produced.
//!
//! A failure while processing one day is logged, counted as an empty
//! day, and never aborts the run: the archive has gaps and the tool is
//! expected to walk over them.

use crate::dates::{expand_date_range, month_file_name, month_key};
use crate::fetch::PageFetcher;
use crate::models::{Article, CrawlSummary};
use crate::outputs::json;
use crate::scrapers::rmrb;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn};

/// Sequential downloader for a date range of newspaper issues.
pub struct Crawler {
    fetcher: PageFetcher,
    base_url: String,
    output_dir: PathBuf,
}

impl Crawler {
    /// Create a crawler writing monthly files under `output_dir`.
    pub fn new(fetcher: PageFetcher, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            base_url: rmrb::BASE_URL.to_string(),
            output_dir: output_dir.into(),
        }
    }

    /// Point the crawler at a different archive root. Tests use this
    /// to substitute a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Download every issue in the inclusive `[begin, end]` range.
    ///
    /// Both bounds are compact `YYYYMMDD` strings. An unparsable bound
    /// or an inverted range aborts before any network activity.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, begin: &str, end: &str) -> Result<CrawlSummary, Box<dyn Error>> {
        let days = expand_date_range(begin, end);
        if days.is_empty() {
            return Err(format!(
                "invalid date range {begin}..{end}: expected YYYYMMDD bounds with begin <= end"
            )
            .into());
        }

        let mut batches: BTreeMap<String, Vec<Article>> = BTreeMap::new();
        let mut current_month: Option<String> = None;
        let mut summary = CrawlSummary::default();

        for day in days {
            let key = month_key(day);
            // Days are ascending, so a key change means the previous
            // month is complete and can leave memory.
            if let Some(prev) = current_month.as_ref() {
                if *prev != key {
                    if let Some(records) = batches.remove(prev) {
                        self.flush_month(prev, records, &mut summary).await;
                    }
                }
            }
            current_month = Some(key.clone());

            let label = day.format("%Y/%m/%d").to_string();
            let batch = batches.entry(key).or_default();
            match self.process_day(day, batch).await {
                Ok((attempted, saved)) if saved > 0 => {
                    info!(day = %label, attempted, saved, "downloaded day");
                    summary.total_articles += saved;
                    summary.success_days += 1;
                }
                Ok((attempted, _)) => {
                    warn!(day = %label, attempted, "no articles downloaded for day");
                    summary.empty_days += 1;
                    summary.failed_days.push(label);
                }
                Err(e) => {
                    error!(day = %label, error = %e, "day failed; continuing with next day");
                    summary.empty_days += 1;
                    summary.failed_days.push(label);
                }
            }
        }

        // BTreeMap iteration is ascending by key, so the trailing
        // flush stays chronological.
        for (key, records) in batches {
            self.flush_month(&key, records, &mut summary).await;
        }

        Ok(summary)
    }

    /// Enumerate one day's sections and articles, appending extracted
    /// records to the month batch. Returns (attempted, saved) counts.
    async fn process_day(
        &self,
        day: NaiveDate,
        batch: &mut Vec<Article>,
    ) -> Result<(usize, usize), Box<dyn Error>> {
        let sections = rmrb::list_sections(&self.fetcher, &self.base_url, day).await;
        if sections.is_empty() {
            warn!(day = %day, "no sections found for issue");
            return Ok((0, 0));
        }

        let mut attempted = 0usize;
        let mut saved = 0usize;
        for section_url in &sections {
            let article_urls = rmrb::list_articles(&self.fetcher, section_url).await;
            if article_urls.is_empty() {
                warn!(%section_url, "no articles found on section page");
                continue;
            }
            for article_url in article_urls {
                attempted += 1;
                let Some(html) = self.fetcher.fetch(&article_url).await else {
                    continue;
                };
                match rmrb::extract_article(&html, &article_url) {
                    Some(article) => {
                        batch.push(article);
                        saved += 1;
                    }
                    None => debug!(%article_url, "page had no extractable article content"),
                }
            }
        }
        Ok((attempted, saved))
    }

    /// Write one finished month to disk. A write failure is logged and
    /// swallowed; the run continues and the range can be re-crawled.
    async fn flush_month(&self, key: &str, records: Vec<Article>, summary: &mut CrawlSummary) {
        if records.is_empty() {
            return;
        }
        let filename = month_file_name(key);
        match json::save_month(&records, &self.output_dir, &filename).await {
            Ok(_) => summary.files_written += 1,
            Err(e) => error!(month = %key, error = %e, "failed to flush monthly batch"),
        }
    }
}
