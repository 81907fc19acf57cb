//! Small file-system helpers shared by the entry point.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write
/// test by creating and immediately deleting a probe file. Running
/// this before the crawl keeps a bad `--output-dir` from surfacing
/// only after hours of downloading.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not
/// writable (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
