//! Media list source
//!
//! - Payload types for the media-coverage endpoint (data.rs)
//! - The single list fetch that yields the grid's locators (list.rs)

pub mod data;
pub mod list;

pub use data::{MediaItem, Thumbnail};
pub use list::{fetch_locators, load_gallery, GalleryLoad, LOAD_FAILED_NOTICE};
