//! Tile codec for the packed `uint8[360]` board.
//!
//! Each byte is one board position. `0` is a free tile; otherwise the low
//! decimal digit is the building level and the rest is the upgrade count:
//!
//! ```text
//! raw = upgrades * 10 + level      e.g. 23 → level 3, 2 upgrades
//! ```
//!
//! The encoding is owned by the contract and must not be re-derived.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::SelectionError;
use crate::kingdom::rules::{MAX_UPGRADES, StatsTable};

/// Number of board positions.
pub const TILE_COUNT: usize = 360;

/// Highest valid tile id.
pub const MAX_TILE_ID: TileId = 359;

/// Index of a board position (`0..=359`).
pub type TileId = u16;

/// Level of a packed tile byte.
#[must_use]
#[inline]
pub const fn level_of(raw: u8) -> u8 {
    raw % 10
}

/// Upgrade count of a packed tile byte.
#[must_use]
#[inline]
pub const fn upgrades_of(raw: u8) -> u8 {
    raw / 10
}

/// A decoded, occupied tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileInfo {
    /// Board position.
    pub tile_id: TileId,
    /// Building level (1-8 for contract data).
    pub level: u8,
    /// Upgrades applied (0-9 for contract data).
    pub upgrades: u8,
    /// Packed byte as stored on chain.
    pub raw: u8,
}

impl TileInfo {
    /// Whether level and upgrade count are inside the contract's domain.
    #[must_use]
    pub const fn is_domain_valid(&self) -> bool {
        self.level >= 1 && self.level <= 8 && self.upgrades <= MAX_UPGRADES
    }
}

/// Decode one packed byte. Returns `None` for a free tile.
#[must_use]
pub const fn decode_tile(tile_id: TileId, raw: u8) -> Option<TileInfo> {
    if raw == 0 {
        return None;
    }
    Some(TileInfo {
        tile_id,
        level: level_of(raw),
        upgrades: upgrades_of(raw),
        raw,
    })
}

/// Iterate over the 360 board positions of a raw tile slice.
///
/// Positions past the end of `tiles` read as 0, anything beyond index 359 is
/// ignored.
fn board_bytes(tiles: &[u8]) -> impl Iterator<Item = (TileId, u8)> + '_ {
    (0..=MAX_TILE_ID).map(move |id| (id, tiles.get(usize::from(id)).copied().unwrap_or(0)))
}

/// Structural view of the board: occupied tiles, free tiles and a membership
/// index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileBoard {
    /// Occupied tiles, ascending by id.
    occupied: Vec<TileInfo>,
    /// Free tile ids, ascending.
    free: Vec<TileId>,
    /// Occupied ids for O(1) membership tests.
    occupied_index: HashSet<TileId>,
}

impl TileBoard {
    /// Decode a raw tile array.
    #[must_use]
    pub fn parse(tiles: &[u8]) -> Self {
        let mut board = Self {
            occupied: Vec::new(),
            free: Vec::with_capacity(TILE_COUNT),
            occupied_index: HashSet::new(),
        };

        for (id, raw) in board_bytes(tiles) {
            match decode_tile(id, raw) {
                Some(info) => {
                    board.occupied_index.insert(id);
                    board.occupied.push(info);
                }
                None => board.free.push(id),
            }
        }

        board
    }

    /// Occupied tiles in ascending id order.
    #[must_use]
    pub fn occupied(&self) -> &[TileInfo] {
        &self.occupied
    }

    /// Free tile ids in ascending order.
    #[must_use]
    pub fn free(&self) -> &[TileId] {
        &self.free
    }

    /// Set of occupied tile ids.
    #[must_use]
    pub fn occupied_index(&self) -> &HashSet<TileId> {
        &self.occupied_index
    }

    /// Check whether a tile holds a building.
    #[must_use]
    pub fn is_occupied(&self, tile_id: TileId) -> bool {
        self.occupied_index.contains(&tile_id)
    }

    /// Look up the decoded building on a tile.
    #[must_use]
    pub fn get(&self, tile_id: TileId) -> Option<&TileInfo> {
        self.occupied
            .binary_search_by_key(&tile_id, |info| info.tile_id)
            .ok()
            .map(|idx| &self.occupied[idx])
    }

    /// Number of occupied tiles.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// Number of free tiles.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

/// Decode a raw tile array. See [`TileBoard::parse`].
#[must_use]
pub fn parse_tiles(tiles: &[u8]) -> TileBoard {
    TileBoard::parse(tiles)
}

/// Check that a tile can be added to a pending build selection.
///
/// Checks run in order: range, occupancy, pending selection.
///
/// # Errors
///
/// Returns the first failing check as a [`SelectionError`].
pub fn validate_tile_selection(
    tile_id: i64,
    occupied_index: &HashSet<TileId>,
    already_selected: &[TileId],
) -> Result<TileId, SelectionError> {
    let id = TileId::try_from(tile_id)
        .ok()
        .filter(|id| *id <= MAX_TILE_ID)
        .ok_or(SelectionError::OutOfRange(tile_id))?;

    if occupied_index.contains(&id) {
        return Err(SelectionError::AlreadyOccupied(id));
    }
    if already_selected.contains(&id) {
        return Err(SelectionError::AlreadySelected(id));
    }
    Ok(id)
}

/// First unoccupied tile in `start_from..=359`.
///
/// Never wraps. Callers wanting full-board wraparound call again with
/// `start_from = 0`.
#[must_use]
pub fn find_next_free(occupied_index: &HashSet<TileId>, start_from: TileId) -> Option<TileId> {
    (start_from..=MAX_TILE_ID).find(|id| !occupied_index.contains(id))
}

/// Upgrade view of an occupied tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingUpgradeInfo {
    /// Board position.
    pub tile_id: TileId,
    /// Packed byte as stored on chain.
    pub raw: u8,
    /// Building level.
    pub level: u8,
    /// Upgrades applied so far.
    pub upgrades: u8,
    /// Upgrades still available.
    pub upgrades_left: u8,
    /// Gold cost of the next upgrade (a quarter of the level's cost).
    pub upgrade_cost: u32,
    /// Per-hour yield added by the next upgrade (a quarter of the level's yield).
    pub upgrade_per_hour: u32,
}

impl BuildingUpgradeInfo {
    /// Whether another upgrade is allowed.
    #[must_use]
    pub const fn can_upgrade(&self) -> bool {
        self.upgrades < MAX_UPGRADES
    }
}

/// Derive upgrade info for every occupied tile with a known level.
///
/// Tiles whose level has no entry in `stats` are skipped.
#[must_use]
pub fn parse_buildings_for_upgrade(tiles: &[u8], stats: &StatsTable) -> Vec<BuildingUpgradeInfo> {
    board_bytes(tiles)
        .filter_map(|(id, raw)| decode_tile(id, raw))
        .filter_map(|info| {
            let level_stats = stats.get(&info.level)?;
            Some(BuildingUpgradeInfo {
                tile_id: info.tile_id,
                raw: info.raw,
                level: info.level,
                upgrades: info.upgrades,
                upgrades_left: MAX_UPGRADES.saturating_sub(info.upgrades),
                upgrade_cost: level_stats.upgrade_cost(),
                upgrade_per_hour: level_stats.upgrade_per_hour(),
            })
        })
        .collect()
}
