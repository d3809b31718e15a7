//! Media list fetch
//!
//! One GET against the list endpoint produces the ordered locators the grid
//! binds to its cells. A failed fetch never propagates past
//! [`load_gallery`]: the grid is left empty and the caller gets exactly one
//! notice to show.

use tracing::{debug, info, warn};

use super::data::MediaItem;
use crate::error::LoadError;
use crate::fetch::Fetcher;

/// Notice shown when the media list cannot be loaded
pub const LOAD_FAILED_NOTICE: &str = "Failed to load images";

/// Result of loading the gallery list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryLoad {
    /// One entry per list item, in list order (empty on failure).
    /// `None` marks an item whose thumbnail is incomplete.
    pub locators: Vec<Option<String>>,
    /// User-visible notice, set only when the list fetch failed
    pub notice: Option<String>,
}

/// Fetch the media list and derive one image locator per item.
///
/// The result has exactly one entry per item so cell `i` always shows item
/// `i`; an item without a complete thumbnail yields `None`.
pub async fn fetch_locators<F: Fetcher>(
    fetcher: &F,
    endpoint: &str,
) -> Result<Vec<Option<String>>, LoadError> {
    let body = fetcher.get(endpoint).await?;
    let items: Vec<MediaItem> = serde_json::from_slice(&body)?;

    let locators: Vec<Option<String>> = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let locator = item.image_locator();
            if locator.is_none() {
                debug!(position, id = ?item.id, "Media item has no complete thumbnail");
            }
            locator
        })
        .collect();

    info!(
        endpoint,
        items = locators.len(),
        blank = locators.iter().filter(|l| l.is_none()).count(),
        "Media list loaded"
    );
    Ok(locators)
}

/// Load the gallery list, turning any failure into an empty grid and a notice
pub async fn load_gallery<F: Fetcher>(fetcher: &F, endpoint: &str) -> GalleryLoad {
    match fetch_locators(fetcher, endpoint).await {
        Ok(locators) => GalleryLoad {
            locators,
            notice: None,
        },
        Err(e) => {
            warn!(endpoint, error = %e, kind = ?e.kind(), "Media list fetch failed");
            GalleryLoad {
                locators: Vec::new(),
                notice: Some(LOAD_FAILED_NOTICE.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fetch::mock::MockFetcher;

    const ENDPOINT: &str = "https://api.example.com/media-coverages?limit=100";

    fn item_json(domain: &str, base: &str, key: &str) -> String {
        format!(
            r#"{{"id":"{key}","thumbnail":{{"domain":"{domain}","basePath":"{base}","key":"{key}"}}}}"#
        )
    }

    #[tokio::test]
    async fn test_locators_follow_list_order() {
        let body = format!(
            "[{},{},{}]",
            item_json("https://cdn.a", "p", "k1"),
            item_json("https://cdn.b", "q/r", "k2"),
            item_json("https://cdn.a", "p", "k3"),
        );
        let fetcher = MockFetcher::new();
        fetcher.respond(ENDPOINT, body.into_bytes());

        let locators = fetch_locators(&fetcher, ENDPOINT).await.unwrap();
        assert_eq!(
            locators,
            vec![
                Some("https://cdn.a/p/0/k1".to_string()),
                Some("https://cdn.b/q/r/0/k2".to_string()),
                Some("https://cdn.a/p/0/k3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_incomplete_items_keep_their_position() {
        let body = format!(
            r#"[{},{{"id":"no-key","thumbnail":{{"domain":"https://cdn","basePath":"b"}}}},{{"id":"no-thumb"}},{}]"#,
            item_json("https://cdn", "b", "first"),
            item_json("https://cdn", "b", "last"),
        );
        let fetcher = MockFetcher::new();
        fetcher.respond(ENDPOINT, body.into_bytes());

        let locators = fetch_locators(&fetcher, ENDPOINT).await.unwrap();
        assert_eq!(locators.len(), 4);
        assert_eq!(locators[0].as_deref(), Some("https://cdn/b/0/first"));
        assert_eq!(locators[1], None);
        assert_eq!(locators[2], None);
        assert_eq!(locators[3].as_deref(), Some("https://cdn/b/0/last"));
    }

    #[tokio::test]
    async fn test_empty_list() {
        let fetcher = MockFetcher::new();
        fetcher.respond(ENDPOINT, b"[]".to_vec());

        let load = load_gallery(&fetcher, ENDPOINT).await;
        assert!(load.locators.is_empty());
        assert_eq!(load.notice, None);
    }

    #[tokio::test]
    async fn test_server_error_gives_empty_grid_and_one_notice() {
        let fetcher = MockFetcher::new();
        fetcher.respond_status(ENDPOINT, 500);

        let load = load_gallery(&fetcher, ENDPOINT).await;
        assert!(load.locators.is_empty());
        assert_eq!(load.notice.as_deref(), Some(LOAD_FAILED_NOTICE));
        assert_eq!(fetcher.calls(ENDPOINT), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_matches_server_error() {
        let failing = MockFetcher::new();
        failing.respond_status(ENDPOINT, 500);
        let malformed = MockFetcher::new();
        malformed.respond(ENDPOINT, b"{\"oops\": [".to_vec());

        let err = fetch_locators(&malformed, ENDPOINT).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        assert_eq!(
            load_gallery(&malformed, ENDPOINT).await,
            load_gallery(&failing, ENDPOINT).await
        );
    }

    #[tokio::test]
    async fn test_object_instead_of_array_is_parse_error() {
        let fetcher = MockFetcher::new();
        fetcher.respond(ENDPOINT, br#"{"items": []}"#.to_vec());

        let err = fetch_locators(&fetcher, ENDPOINT).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
