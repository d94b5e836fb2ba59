//! Pending tile selection for a batch build.

use crate::error::SelectionError;
use crate::kingdom::tiles::{TileBoard, TileId, find_next_free, validate_tile_selection};

/// Tiles picked for a build that has not been submitted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileSelection {
    tiles: Vec<TileId>,
}

impl TileSelection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    /// Selected tiles in the order they were added.
    #[must_use]
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Number of selected tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Validate a tile against the board and add it.
    ///
    /// # Errors
    ///
    /// Returns the [`SelectionError`] from [`validate_tile_selection`].
    pub fn add(&mut self, tile_id: i64, board: &TileBoard) -> Result<TileId, SelectionError> {
        let id = validate_tile_selection(tile_id, board.occupied_index(), &self.tiles)?;
        self.tiles.push(id);
        Ok(id)
    }

    /// Remove a tile. Returns `false` if it was not selected.
    pub fn remove(&mut self, tile_id: TileId) -> bool {
        let before = self.tiles.len();
        self.tiles.retain(|&id| id != tile_id);
        self.tiles.len() != before
    }

    /// Drop every selected tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Add the next free tile after the highest selected one.
    ///
    /// Searches forward from just past the highest selected tile, then once
    /// more from 0, skipping tiles that are already selected. Returns `None`
    /// when no eligible tile is left.
    pub fn add_next_free(&mut self, board: &TileBoard) -> Option<TileId> {
        let occupied = board.occupied_index();
        let start = self.tiles.iter().max().map_or(0, |&max| max.saturating_add(1));

        let mut candidate = find_next_free(occupied, start);
        if candidate.is_none() && start > 0 {
            candidate = find_next_free(occupied, 0);
        }

        while let Some(id) = candidate {
            if !self.tiles.contains(&id) {
                self.tiles.push(id);
                return Some(id);
            }
            candidate = find_next_free(occupied, id.saturating_add(1));
        }
        None
    }
}
