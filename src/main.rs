//! thumbgrid - headless gallery runner
//!
//! Fetches the media list, binds every item to a grid cell and waits until
//! each cell has either shown its image or failed. Images are served from
//! the on-disk cache when present.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{info, warn};

use thumbgrid::cache::ImageCache;
use thumbgrid::config::{ConfigError, GalleryConfig};
use thumbgrid::fetch::HttpFetcher;
use thumbgrid::gallery::load_gallery;
use thumbgrid::loader::{CellState, CellUpdate, Loader};
use thumbgrid::logging::init_logging;
use thumbgrid::{CacheError, LoadError};

#[derive(Parser, Debug)]
#[command(name = "thumbgrid", version)]
#[command(about = "Load a media gallery into a cached image grid", long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Media list endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Image cache directory (default: platform cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    columns: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Connect timeout in seconds
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// Remove all cached images before loading
    #[arg(long)]
    clear_cache: bool,

    /// Print cache statistics and exit
    #[arg(long)]
    stats: bool,
}

/// Everything that can stop a run
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Outcome of one gallery run
#[derive(Debug, Clone, Default)]
struct GalleryReport {
    cells: usize,
    applied: usize,
    failed: usize,
}

impl Args {
    fn into_config(self) -> Result<GalleryConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GalleryConfig::load(path)?,
            None => GalleryConfig::default(),
        };

        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(dir) = self.cache_dir {
            config.cache_dir = Some(dir);
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout_secs = secs;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), RunError> {
    let clear_cache = args.clear_cache;
    let stats_only = args.stats;
    let config = args.into_config()?;

    let cache_dir = config.resolve_cache_dir()?;
    let fetcher = HttpFetcher::new(config.timeout(), config.connect_timeout())?;
    let cache = ImageCache::open(cache_dir, fetcher.clone())?;

    if clear_cache {
        let removed = cache.clear()?;
        println!("Removed {removed} cached images");
    }

    if stats_only {
        let stats = cache.stats()?;
        println!("Cache directory: {}", cache.dir().display());
        println!("Entries:         {}", stats.entries);
        println!("Total size:      {} bytes", stats.total_bytes);
        if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
            println!("Oldest entry:    {}", oldest.to_rfc3339());
            println!("Newest entry:    {}", newest.to_rfc3339());
        }
        return Ok(());
    }

    let gallery = load_gallery(&fetcher, &config.endpoint).await;
    if let Some(notice) = &gallery.notice {
        // The grid stays empty; the notice is the only thing the user sees
        eprintln!("{notice}");
        return Ok(());
    }

    let mut loader = Loader::new(Arc::new(cache));
    loader.bind_all(&gallery.locators);

    while let Some(update) = loader.next_update().await {
        let (row, col) = config.position(update.cell());
        match update {
            CellUpdate::Applied { cell, locator } => {
                info!(cell, row, col, locator = %locator, "Cell loaded");
            }
            CellUpdate::Failed { cell, locator, kind } => {
                warn!(cell, row, col, locator = %locator, ?kind, "Cell left blank");
            }
        }
    }

    debug_assert_eq!(loader.count(CellState::Loading), 0);
    // Cells without a locator never produce an update, so count final states
    let report = GalleryReport {
        cells: gallery.locators.len(),
        applied: loader.count(CellState::Applied),
        failed: loader.count(CellState::Failed),
    };
    println!(
        "Gallery loaded: {} cells, {} images shown, {} blank",
        report.cells, report.applied, report.failed
    );
    Ok(())
}
