//! # rmrb_corpus
//!
//! A downloader that turns the People's Daily (人民日报) online archive
//! into a month-keyed JSON text corpus.
//!
//! ## Features
//!
//! - Walks an inclusive `YYYYMMDD` date range, one issue per day
//! - Discovers section and article links across both archive templates
//!   (the legacy id-based layout and the redesigned class-based one)
//! - Retries transient fetch failures with a bounded budget; decodes
//!   GB2312/GBK-era pages by declared or sniffed charset
//! - Accumulates articles per month and flushes each month's JSON file
//!   as soon as the crawl moves past it
//! - Optional cleanup pass dropping editorial credit lines and empty
//!   records from already-written files
//!
//! ## Usage
//!
//! ```sh
//! rmrb_corpus -b 20230501 -e 20240430 -o ./data/rmrb --clean
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs strictly sequentially, one request in flight at a
//! time:
//! 1. **Planning**: expand the date range into calendar days
//! 2. **Discovery**: issue index → section pages → article URLs
//! 3. **Extraction**: title and body text per article page
//! 4. **Output**: one `YYYY-MM.json` array file per processed month

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod crawler;
mod dates;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use crawler::Crawler;
use fetch::PageFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    info!(
        begin = %args.begin_date,
        end = %args.end_date,
        output_dir = %args.output_dir,
        "rmrb_corpus starting up"
    );

    // Early check: a bad output directory should fail now, not after
    // hours of downloading.
    if let Err(e) = utils::ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = PageFetcher::new(
        Duration::from_secs(args.timeout_secs),
        args.max_retries,
        Duration::from_millis(args.retry_delay_ms),
    )?;
    let crawler = Crawler::new(fetcher, &args.output_dir);

    let summary = crawler.run(&args.begin_date, &args.end_date).await?;
    info!(
        total_articles = summary.total_articles,
        files_written = summary.files_written,
        success_days = summary.success_days,
        empty_days = summary.empty_days,
        "crawl finished"
    );
    if !summary.failed_days.is_empty() {
        warn!(
            days = ?summary.failed_days,
            "days without a single downloaded article; re-run these ranges to fill gaps"
        );
    }

    if args.clean {
        let dropped =
            outputs::json::clean_directory(Path::new(&args.output_dir), &args.boilerplate_marker)
                .await?;
        info!(dropped, marker = %args.boilerplate_marker, "cleanup pass finished");
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "execution complete");

    Ok(())
}
