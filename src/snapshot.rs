//! Snapshot files: a map plus the acting player, as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FlowError;
use crate::grid::{Cell, GameMap, PlayerId};

/// Serializable form of one turn's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Map width.
    pub width: u16,
    /// Map height.
    pub height: u16,
    /// Acting player.
    pub player: PlayerId,
    /// Cells in row-major order.
    pub cells: Vec<Cell>,
}

/// Error loading or saving a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Not valid snapshot JSON.
    #[error("snapshot JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    /// JSON parsed but the grid is inconsistent.
    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl Snapshot {
    /// Capture a map for `player`.
    #[must_use]
    pub fn from_map(map: &GameMap, player: PlayerId) -> Self {
        Self {
            width: map.width(),
            height: map.height(),
            player,
            cells: map.cells().to_vec(),
        }
    }

    /// Validate and build the map.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::MalformedSnapshot`] if the cell count does not
    /// match the declared dimensions.
    pub fn to_map(&self) -> Result<GameMap, FlowError> {
        GameMap::new(self.width, self.height, self.cells.clone())
    }

    /// Parse snapshot JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON or an inconsistent grid.
    pub fn from_json(json: &str) -> Result<(Self, GameMap), SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        let map = snapshot.to_map()?;
        Ok((snapshot, map))
    }

    /// Load and validate a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn load(path: &Path) -> Result<(Self, GameMap), SnapshotError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the snapshot as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
