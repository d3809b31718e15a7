//! Fetch-through image cache
//!
//! `get` looks for `{dir}/{key}.png` first. On a miss it downloads the
//! locator, decodes it, writes a PNG copy through a temporary file and an
//! atomic rename, and returns the decoded image. Nothing is retried and a
//! stale entry is never served in place of a failed fetch.

use image::{DynamicImage, ImageFormat};
use std::io::{self, Cursor, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::key::CacheKey;
use super::stats::{self, CacheStats};
use crate::error::{CacheError, LoadError};
use crate::fetch::Fetcher;

/// Prefix of in-progress writes; never matches an entry name
const TEMP_PREFIX: &str = ".tmp-";

/// Durable, keyed cache of decoded images in front of a [`Fetcher`]
pub struct ImageCache<F> {
    dir: PathBuf,
    fetcher: F,
}

impl<F: Fetcher> ImageCache<F> {
    /// Open (and create if needed) a cache rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>, fetcher: F) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;

        info!(dir = %dir.display(), "Image cache opened");
        Ok(Self { dir, fetcher })
    }

    /// Directory holding the cache entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry a locator maps to (whether or not it exists yet)
    pub fn path_for(&self, locator: &str) -> PathBuf {
        self.dir.join(CacheKey::from_locator(locator).file_name())
    }

    /// Whether a durable entry exists for `locator`
    pub async fn contains(&self, locator: &str) -> bool {
        tokio::fs::try_exists(self.path_for(locator))
            .await
            .unwrap_or(false)
    }

    /// Summarize the entries currently on disk
    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        stats::scan(&self.dir)
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(&self) -> Result<usize, CacheError> {
        stats::clear(&self.dir)
    }

    /// Return the decoded image for `locator`, fetching and persisting it on a miss
    pub async fn get(&self, locator: &str) -> Result<DynamicImage, LoadError> {
        let key = CacheKey::from_locator(locator);
        let path = self.dir.join(key.file_name());

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(locator, key = %key, "Cache hit");
                return decode_entry(path, bytes).await;
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                debug!(locator, key = %key, "Cache miss");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache entry unreadable");
                return Err(LoadError::CorruptEntry { path });
            }
        }

        let bytes = self.fetcher.get(locator).await?;

        let dir = self.dir.clone();
        let locator = locator.to_string();
        tokio::task::spawn_blocking(move || decode_and_store(&dir, &path, &locator, &bytes))
            .await
            .map_err(|e| LoadError::Task(e.to_string()))?
    }
}

/// Decode a cached PNG on the blocking pool
async fn decode_entry(path: PathBuf, bytes: Vec<u8>) -> Result<DynamicImage, LoadError> {
    tokio::task::spawn_blocking(move || {
        image::load_from_memory_with_format(&bytes, ImageFormat::Png).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Cache entry failed to decode");
            LoadError::CorruptEntry { path }
        })
    })
    .await
    .map_err(|e| LoadError::Task(e.to_string()))?
}

/// Decode downloaded bytes, then persist them as a PNG entry
fn decode_and_store(
    dir: &Path,
    path: &Path,
    locator: &str,
    bytes: &[u8],
) -> Result<DynamicImage, LoadError> {
    let img = image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
        locator: locator.to_string(),
        source,
    })?;
    let img = to_png_compatible(img);

    let persist_err = |source: io::Error| LoadError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let mut encoded = Cursor::new(Vec::new());
    img.write_to(&mut encoded, ImageFormat::Png)
        .map_err(|e| persist_err(io::Error::other(e)))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(persist_err)?;
    tmp.write_all(encoded.get_ref()).map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;

    debug!(
        locator,
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Cache entry stored"
    );
    Ok(img)
}

/// PNG has no floating point samples; OpenEXR and HDR downloads are
/// narrowed to 16 bits per channel before they are stored or returned.
fn to_png_compatible(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(img.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(img.to_rgba16()),
        other => other,
    }
}
