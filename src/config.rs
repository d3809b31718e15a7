//! Gallery configuration
//!
//! The library core takes everything it needs as arguments; this struct only
//! gathers those values for the binary. It can be read from a JSON file and
//! is then overridden by command line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CacheError;

/// Media-coverage list endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://acharyaprashant.org/api/v2/content/misc/media-coverages?limit=100";

/// Grid width in cells
pub const DEFAULT_COLUMNS: usize = 3;

/// Request timeout for list and image fetches
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connect timeout for list and image fetches
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// All settings of a gallery run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// Media list endpoint
    pub endpoint: String,
    /// Directory of cached images; `None` uses [`default_cache_dir`]
    pub cache_dir: Option<PathBuf>,
    /// Grid width, used to report cell positions as row/column
    pub columns: usize,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_dir: None,
            columns: DEFAULT_COLUMNS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl GalleryConfig {
    /// Parse from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// The configured cache directory, or the platform default
    pub fn resolve_cache_dir(&self) -> Result<PathBuf, CacheError> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_dir(),
        }
    }

    /// Row and column of `cell` in the grid
    pub fn position(&self, cell: usize) -> (usize, usize) {
        let columns = self.columns.max(1);
        (cell / columns, cell % columns)
    }
}

/// Failure to load a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Get the image cache directory
/// Returns ~/.cache/thumbgrid/images on Linux
pub fn default_cache_dir() -> Result<PathBuf, CacheError> {
    let mut path = dirs_next::cache_dir()
        .or_else(dirs_next::home_dir)
        .ok_or(CacheError::NoCacheDir)?;

    path.push("thumbgrid");
    path.push("images");
    Ok(path)
}
