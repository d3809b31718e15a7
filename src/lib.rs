//! thumbgrid - cached image loading for a gallery grid
//!
//! A media list is fetched once and turned into image locators. Each grid
//! cell is bound to a locator through the [`loader::Loader`], which asks the
//! [`cache::ImageCache`] for the decoded image. The cache serves a PNG copy
//! from disk when it has one and otherwise downloads, decodes and stores it.
//!
//! ```ignore
//! use std::sync::Arc;
//! use thumbgrid::cache::ImageCache;
//! use thumbgrid::fetch::HttpFetcher;
//! use thumbgrid::gallery::load_gallery;
//! use thumbgrid::loader::Loader;
//!
//! let fetcher = HttpFetcher::new(timeout, connect_timeout)?;
//! let gallery = load_gallery(&fetcher, endpoint).await;
//! let cache = Arc::new(ImageCache::open(cache_dir, fetcher)?);
//! let mut loader = Loader::new(cache);
//! loader.bind_all(&gallery.locators);
//! while let Some(update) = loader.next_update().await {
//!     // redraw update.cell()
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gallery;
pub mod loader;
pub mod logging;

pub use error::{CacheError, ErrorKind, LoadError};
