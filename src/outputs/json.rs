//! Month-keyed JSON persistence, loading, and cleanup.
//!
//! Records are serialized with readable indentation and non-ASCII text
//! kept literal, so the files stay grep-able and diff-able by hand.
//! Serialization is deterministic and order-preserving, which is what
//! makes [`clean_directory`] idempotent: re-running it over an
//! already-cleaned directory rewrites byte-identical files.

use crate::models::Article;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// Write one month's records to `dir/filename`, creating the
/// directory if needed and overwriting any existing file.
#[instrument(level = "debug", skip(records), fields(count = records.len()))]
pub async fn save_month(
    records: &[Article],
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(dir).await?;
    let json = serde_json::to_string_pretty(records)?;
    let path = dir.join(filename);
    fs::write(&path, json).await?;
    info!(path = %path.display(), count = records.len(), "wrote monthly batch");
    Ok(path)
}

/// Load every monthly file in `dir` and concatenate the arrays.
///
/// Files are visited in directory-listing order, so the combined
/// sequence is not guaranteed to be chronological across months.
pub async fn load_all(dir: &Path) -> Result<Vec<Article>, Box<dyn Error>> {
    let mut records = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let text = fs::read_to_string(&path).await?;
        let month: Vec<Article> = serde_json::from_str(&text)?;
        records.extend(month);
    }
    Ok(records)
}

/// Drop boilerplate and empty records from every monthly file.
///
/// A record is dropped when its title contains `marker` (an editorial
/// credit line rather than an article) or its content trims to empty.
/// Each file is rewritten with the filtered array; files that fail to
/// parse as a record array are left untouched. Returns the number of
/// records dropped.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), marker = %marker))]
pub async fn clean_directory(dir: &Path, marker: &str) -> Result<usize, Box<dyn Error>> {
    let mut dropped_total = 0usize;
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let text = fs::read_to_string(&path).await?;
        let records: Vec<Article> = match serde_json::from_str(&text) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "not a record array; skipping");
                continue;
            }
        };

        let before = records.len();
        let kept: Vec<Article> = records
            .into_iter()
            .filter(|r| !r.title.contains(marker) && !r.content.trim().is_empty())
            .collect();
        let dropped = before - kept.len();
        dropped_total += dropped;

        fs::write(&path, serde_json::to_string_pretty(&kept)?).await?;
        if dropped > 0 {
            info!(path = %path.display(), dropped, kept = kept.len(), "filtered monthly file");
        }
    }
    Ok(dropped_total)
}
