//! Keyed fetch-through cache of decoded images
//!
//! This module handles:
//! - Deriving a stable file name from a locator (key.rs)
//! - Serving entries from disk, or fetching, decoding and storing them (store.rs)
//! - Inspecting and clearing the cache directory (stats.rs)
//!
//! There is no TTL and no eviction. Concurrent first-time loads of the same
//! locator are not deduplicated; each fetches and writes, and the atomic
//! rename leaves one complete entry.

pub mod key;
pub mod stats;
pub mod store;

pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::ImageCache;
