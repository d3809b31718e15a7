//! Cache directory inspection and clearing

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::key::ENTRY_EXTENSION;
use crate::error::CacheError;

/// Summary of the entries currently on disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

fn is_entry(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
}

/// Scan `dir` and summarize its cache entries
pub fn scan(dir: &Path) -> Result<CacheStats, CacheError> {
    let mut stats = CacheStats::default();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_entry(entry.path()) {
            continue;
        }

        let metadata = entry.metadata()?;
        stats.entries += 1;
        stats.total_bytes += metadata.len();

        if let Ok(modified) = metadata.modified() {
            let modified = DateTime::<Utc>::from(modified);
            stats.oldest = Some(stats.oldest.map_or(modified, |t| t.min(modified)));
            stats.newest = Some(stats.newest.map_or(modified, |t| t.max(modified)));
        }
    }

    debug!(
        dir = %dir.display(),
        entries = stats.entries,
        bytes = stats.total_bytes,
        "Cache scanned"
    );
    Ok(stats)
}

/// Remove every cache entry in `dir`, returning how many were removed
pub fn clear(dir: &Path) -> Result<usize, CacheError> {
    let mut removed = 0;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_entry(entry.path()) {
            continue;
        }

        std::fs::remove_file(entry.path()).map_err(|source| CacheError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        removed += 1;
    }

    info!(dir = %dir.display(), removed, "Cache cleared");
    Ok(removed)
}
