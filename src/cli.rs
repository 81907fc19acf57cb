//! Command-line interface definitions.
//!
//! All knobs of the downloader are plain flags with defaults matching
//! the production crawl: a 30 second request timeout, three fetch
//! attempts per URL, one second between attempts.

use clap::Parser;

/// Command-line arguments for the People's Daily corpus downloader.
///
/// # Examples
///
/// ```sh
/// # Download May 2023 into the default directory
/// rmrb_corpus -b 20230501 -e 20230531
///
/// # A year's range with the cleanup pass applied afterwards
/// rmrb_corpus -b 20230501 -e 20240430 -o ./data/rmrb --clean
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// First issue date to download, as YYYYMMDD
    #[arg(short, long)]
    pub begin_date: String,

    /// Last issue date to download (inclusive), as YYYYMMDD
    #[arg(short, long)]
    pub end_date: String,

    /// Directory the monthly JSON files are written to (created if absent)
    #[arg(short, long, default_value = "./data/rmrb")]
    pub output_dir: String,

    /// Total fetch attempts per URL before giving up on it
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,

    /// Delay between fetch attempts, in milliseconds (0 disables the wait)
    #[arg(long, default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Drop boilerplate and empty records from the output directory
    /// after the crawl finishes
    #[arg(long)]
    pub clean: bool,

    /// Title substring marking an editorial credit line rather than an
    /// article; used by the cleanup pass
    #[arg(long, default_value = "本版责编")]
    pub boilerplate_marker: String,
}
