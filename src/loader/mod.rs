//! Per-cell image loading for the grid
//!
//! The [`Loader`] is owned by a single consumer (the component that draws
//! the grid). Each `bind` spawns one task that asks the [`ImageCache`] for
//! the cell's locator; results come back over a channel and are applied by
//! the consumer in [`Loader::next_update`].
//!
//! Rebinding a cell cancels its previous task through that task's
//! [`CancellationToken`]. A result that still arrives for a superseded bind
//! is dropped: every result carries the generation of the bind that started
//! it, and only the cell's current generation is ever applied.

pub mod cell;

use image::DynamicImage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::cache::ImageCache;
use crate::error::LoadError;
use crate::fetch::Fetcher;

pub use cell::{CellState, CellUpdate};
use cell::CellSlot;

/// Result of one load task, delivered to the consumer
#[derive(Debug)]
pub(crate) struct LoadOutcome {
    cell: usize,
    generation: u64,
    locator: String,
    result: Result<DynamicImage, LoadError>,
}

/// Cancellation-aware dispatcher of cache loads, one per bound cell
pub struct Loader<F: Fetcher> {
    cache: Arc<ImageCache<F>>,
    cells: HashMap<usize, CellSlot>,
    next_generation: u64,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl<F: Fetcher> Loader<F> {
    pub fn new(cache: Arc<ImageCache<F>>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            cache,
            cells: HashMap::new(),
            next_generation: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Associate `cell` with `locator` and start loading it.
    ///
    /// Any load already running for `cell` is cancelled first, and the cell
    /// is blank until the new load completes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(&mut self, cell: usize, locator: impl Into<String>) {
        let locator = locator.into();
        self.next_generation += 1;
        let generation = self.next_generation;
        let token = CancellationToken::new();

        let slot = self.cells.entry(cell).or_default();
        if slot.cancel_in_flight() {
            debug!(
                cell,
                previous = slot.locator.as_deref().unwrap_or_default(),
                "Cancelled superseded load"
            );
        }
        slot.generation = generation;
        slot.locator = Some(locator.clone());
        slot.state = CellState::Loading;
        slot.image = None;
        slot.token = Some(token.clone());

        trace!(cell, generation, locator = %locator, "Load started");

        let cache = Arc::clone(&self.cache);
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                result = cache.get(&locator) => result,
            };

            // The fetch may finish after a rebind; the consumer re-checks the generation
            if token.is_cancelled() {
                return;
            }

            let _ = outcome_tx.send(LoadOutcome {
                cell,
                generation,
                locator,
                result,
            });
        });
    }

    /// Bind cells `0..locators.len()` in order.
    ///
    /// A `None` entry keeps its cell position but leaves the cell blank.
    pub fn bind_all<S: AsRef<str>>(&mut self, locators: &[Option<S>]) {
        for (cell, locator) in locators.iter().enumerate() {
            match locator {
                Some(locator) => self.bind(cell, locator.as_ref()),
                None => self.blank(cell),
            }
        }
    }

    /// Mark `cell` as having nothing to load.
    ///
    /// Any in-flight load is cancelled and the cell ends `Failed` with no
    /// image and no locator.
    pub fn blank(&mut self, cell: usize) {
        self.next_generation += 1;
        let slot = self.cells.entry(cell).or_default();
        slot.cancel_in_flight();
        slot.generation = self.next_generation;
        slot.locator = None;
        slot.state = CellState::Failed;
        slot.image = None;
        debug!(cell, "Cell has no image locator");
    }

    /// Cancel the in-flight load of `cell` without a replacement.
    ///
    /// A `Loading` cell becomes `Cancelled`; other states are left alone.
    pub fn cancel(&mut self, cell: usize) {
        if let Some(slot) = self.cells.get_mut(&cell) {
            if slot.state == CellState::Loading {
                slot.cancel_in_flight();
                slot.state = CellState::Cancelled;
                slot.image = None;
                debug!(cell, "Load cancelled");
            }
        }
    }

    /// Cancel every in-flight load
    pub fn shutdown(&mut self) {
        let loading: Vec<usize> = self
            .cells
            .iter()
            .filter(|(_, slot)| slot.state == CellState::Loading)
            .map(|(cell, _)| *cell)
            .collect();
        for cell in loading {
            self.cancel(cell);
        }
    }

    pub fn state(&self, cell: usize) -> CellState {
        self.cells
            .get(&cell)
            .map(|slot| slot.state)
            .unwrap_or_default()
    }

    /// Image currently shown by `cell`, if any
    pub fn image(&self, cell: usize) -> Option<&Arc<DynamicImage>> {
        self.cells.get(&cell).and_then(|slot| slot.image.as_ref())
    }

    /// Locator `cell` is currently bound to
    pub fn locator(&self, cell: usize) -> Option<&str> {
        self.cells.get(&cell).and_then(|slot| slot.locator.as_deref())
    }

    /// Number of cells still loading
    pub fn in_flight(&self) -> usize {
        self.cells
            .values()
            .filter(|slot| slot.state == CellState::Loading)
            .count()
    }

    /// Number of cells in `state`
    pub fn count(&self, state: CellState) -> usize {
        self.cells.values().filter(|slot| slot.state == state).count()
    }

    /// Wait for the next current result and apply it.
    ///
    /// Stale results are discarded silently. Returns `None` once no cell is
    /// loading.
    pub async fn next_update(&mut self) -> Option<CellUpdate> {
        while self.in_flight() > 0 {
            let outcome = self.outcome_rx.recv().await?;
            if let Some(update) = self.apply(outcome) {
                return Some(update);
            }
        }
        None
    }

    /// Apply outcomes until every cell has left `Loading`
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    /// Apply one outcome if it belongs to its cell's current bind
    pub(crate) fn apply(&mut self, outcome: LoadOutcome) -> Option<CellUpdate> {
        let LoadOutcome {
            cell,
            generation,
            locator,
            result,
        } = outcome;

        let slot = self.cells.get_mut(&cell)?;
        if slot.generation != generation || slot.state != CellState::Loading {
            trace!(cell, generation, current = slot.generation, "Discarded stale result");
            return None;
        }
        slot.token = None;

        match result {
            Ok(img) => {
                slot.image = Some(Arc::new(img));
                slot.state = CellState::Applied;
                trace!(cell, locator = %locator, "Image applied");
                Some(CellUpdate::Applied { cell, locator })
            }
            Err(e) => {
                slot.image = None;
                slot.state = CellState::Failed;
                debug!(cell, locator = %locator, error = %e, "Image load failed");
                Some(CellUpdate::Failed {
                    cell,
                    locator,
                    kind: e.kind(),
                })
            }
        }
    }
}

impl<F: Fetcher> Drop for Loader<F> {
    fn drop(&mut self) {
        for slot in self.cells.values_mut() {
            slot.cancel_in_flight();
        }
    }
}
