//! Per-cell load state

use image::DynamicImage;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::ErrorKind;

/// Lifecycle of one grid cell
///
/// `Idle → Loading → {Applied | Cancelled | Failed}`; any state re-enters
/// `Loading` on the next bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Idle,
    Loading,
    Applied,
    Cancelled,
    Failed,
}

/// A change applied to a cell by [`super::Loader::next_update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellUpdate {
    /// The cell now shows the image loaded from `locator`
    Applied { cell: usize, locator: String },
    /// The load for `locator` failed; the cell stays blank
    Failed {
        cell: usize,
        locator: String,
        kind: ErrorKind,
    },
}

impl CellUpdate {
    pub fn cell(&self) -> usize {
        match self {
            CellUpdate::Applied { cell, .. } | CellUpdate::Failed { cell, .. } => *cell,
        }
    }
}

/// Consumer-side state of one cell
#[derive(Debug, Default)]
pub(crate) struct CellSlot {
    /// Generation of the bind that currently owns the cell
    pub generation: u64,
    pub locator: Option<String>,
    pub state: CellState,
    pub image: Option<Arc<DynamicImage>>,
    /// Token of the in-flight load, present only while `Loading`
    pub token: Option<CancellationToken>,
}

impl CellSlot {
    /// Cancel the in-flight load, if any. Returns whether one was cancelled.
    pub fn cancel_in_flight(&mut self) -> bool {
        match self.token.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}
