//! Cache key derivation
//!
//! A [`CacheKey`] is the lowercase hex SHA-256 digest of the locator's UTF-8
//! bytes. The digest is fixed and documented so two builds always agree on
//! which file belongs to which locator.

use sha2::{Digest, Sha256};
use std::fmt;

/// File extension of every cache entry
pub const ENTRY_EXTENSION: &str = "png";

/// Stable name of the durable entry for one locator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a locator
    pub fn from_locator(locator: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(locator.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the entry inside the cache directory (`{key}.png`)
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, ENTRY_EXTENSION)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
