//! End-to-end flow through the public API: list fetch, grid binding, cache.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use thumbgrid::cache::ImageCache;
use thumbgrid::fetch::Fetcher;
use thumbgrid::gallery::{load_gallery, LOAD_FAILED_NOTICE};
use thumbgrid::loader::{CellState, Loader};
use thumbgrid::LoadError;

const ENDPOINT: &str = "https://api.example.com/media-coverages?limit=100";

/// Fetcher serving a fixed set of bodies and counting every request
#[derive(Clone, Default)]
struct StaticFetcher {
    bodies: Arc<HashMap<String, Vec<u8>>>,
    requests: Arc<AtomicUsize>,
}

impl StaticFetcher {
    fn new(bodies: HashMap<String, Vec<u8>>) -> Self {
        Self {
            bodies: Arc::new(bodies),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Fetcher for StaticFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.bodies.get(url).cloned().ok_or_else(|| LoadError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn png(width: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, width, image::Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn gallery_fixture() -> HashMap<String, Vec<u8>> {
    let list = r#"[
        {"id": "1", "thumbnail": {"domain": "https://cdn.example.com", "basePath": "covers", "key": "a.png"}},
        {"id": "2", "thumbnail": {"domain": "https://cdn.example.com", "basePath": "covers", "key": "b.png"}},
        {"id": "3", "thumbnail": {"domain": "https://cdn.example.com", "basePath": "covers"}},
        {"id": "4", "thumbnail": {"domain": "https://cdn.example.com", "basePath": "covers", "key": "missing.png"}}
    ]"#;

    let mut bodies = HashMap::new();
    bodies.insert(ENDPOINT.to_string(), list.as_bytes().to_vec());
    bodies.insert("https://cdn.example.com/covers/0/a.png".to_string(), png(4));
    bodies.insert("https://cdn.example.com/covers/0/b.png".to_string(), png(6));
    bodies
}

#[tokio::test]
async fn test_gallery_loads_then_serves_from_cache() {
    let dir = TempDir::new().unwrap();
    let fetcher = StaticFetcher::new(gallery_fixture());

    let gallery = load_gallery(&fetcher, ENDPOINT).await;
    assert_eq!(gallery.notice, None);
    assert_eq!(gallery.locators.len(), 4);
    assert_eq!(gallery.locators[2], None);

    let cache = Arc::new(ImageCache::open(dir.path(), fetcher.clone()).unwrap());
    let mut loader = Loader::new(Arc::clone(&cache));
    loader.bind_all(&gallery.locators);
    loader.settle().await;

    assert_eq!(loader.state(0), CellState::Applied);
    assert_eq!(loader.state(1), CellState::Applied);
    assert_eq!(loader.state(2), CellState::Failed);
    assert!(loader.image(2).is_none());
    assert_eq!(loader.locator(2), None);
    assert_eq!(loader.state(3), CellState::Failed);
    assert!(loader.image(3).is_none());
    assert_eq!(loader.image(1).unwrap().width(), 6);
    assert_eq!(cache.stats().unwrap().entries, 2);

    // One list request plus three image requests; the incomplete item fetches nothing
    assert_eq!(fetcher.requests(), 4);

    // A fresh grid over the same cache only goes to the network for the miss
    let mut second = Loader::new(Arc::clone(&cache));
    second.bind_all(&gallery.locators);
    second.settle().await;

    assert_eq!(second.count(CellState::Applied), 2);
    assert_eq!(fetcher.requests(), 5);
    assert_eq!(
        loader.image(0).unwrap().as_bytes(),
        second.image(0).unwrap().as_bytes()
    );
}

#[tokio::test]
async fn test_unreachable_list_gives_empty_grid() {
    let fetcher = StaticFetcher::new(HashMap::new());

    let gallery = load_gallery(&fetcher, ENDPOINT).await;
    assert!(gallery.locators.is_empty());
    assert_eq!(gallery.notice.as_deref(), Some(LOAD_FAILED_NOTICE));
}
