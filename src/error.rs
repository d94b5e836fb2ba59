//! Error types for tile selection and write guards.
//!
//! None of these are fatal. They are returned to the caller, which decides
//! whether to reject an input or disable a submit action.

use std::fmt;

use crate::kingdom::TileId;

/// Why a tile cannot be added to a pending build selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// Tile id is outside `0..=359`.
    OutOfRange(i64),
    /// A building already stands on the tile.
    AlreadyOccupied(TileId),
    /// The tile is already in the pending selection.
    AlreadySelected(TileId),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::OutOfRange(id) => write!(f, "tile id {id} is outside 0..=359"),
            SelectionError::AlreadyOccupied(id) => write!(f, "tile {id} is already occupied"),
            SelectionError::AlreadySelected(id) => write!(f, "tile {id} is already selected"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Balance a guard checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Gold (shown as silver in the game UI).
    Gold,
    /// Gems.
    Gems,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Gold => write!(f, "gold"),
            Resource::Gems => write!(f, "gems"),
        }
    }
}

/// Outcome of a write guard that refused to produce a contract call.
///
/// `InsufficientBalance` is an expected state (the submit button is simply
/// disabled), not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Build requested with no tiles selected.
    EmptySelection,
    /// Building level has no entry in the stats table.
    UnknownLevel(u8),
    /// A selected tile became occupied in the latest snapshot.
    TileOccupied(TileId),
    /// Upgrade target has no building.
    TileEmpty(TileId),
    /// Tile id is outside `0..=359`.
    TileOutOfRange(TileId),
    /// Building already carries the maximum number of upgrades.
    MaxUpgrades(TileId),
    /// Projected balance does not cover the action.
    InsufficientBalance {
        /// Which balance was checked.
        resource: Resource,
        /// Amount the action needs.
        required: u64,
        /// Projected balance at submission time.
        available: u64,
    },
    /// Amount must be a positive integer.
    NonPositiveAmount,
    /// Win chance outside the contract's accepted range.
    WinChanceOutOfRange(i64),
    /// Battle cooldown has not elapsed.
    BattleCooldown {
        /// Seconds until the next battle is allowed.
        remaining: u64,
    },
    /// Account has never claimed (`claimTime == 0`).
    Unregistered,
    /// Account produces nothing per hour.
    NoBuildings,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptySelection => write!(f, "no tiles selected"),
            Rejection::UnknownLevel(level) => write!(f, "unknown building level {level}"),
            Rejection::TileOccupied(id) => write!(f, "tile {id} is occupied"),
            Rejection::TileEmpty(id) => write!(f, "tile {id} has no building"),
            Rejection::TileOutOfRange(id) => write!(f, "tile id {id} is outside 0..=359"),
            Rejection::MaxUpgrades(id) => write!(f, "building on tile {id} is fully upgraded"),
            Rejection::InsufficientBalance {
                resource,
                required,
                available,
            } => write!(
                f,
                "insufficient {resource}: need {required}, projected {available}"
            ),
            Rejection::NonPositiveAmount => write!(f, "amount must be a positive integer"),
            Rejection::WinChanceOutOfRange(value) => {
                write!(f, "win chance {value} is outside 40..=60")
            }
            Rejection::BattleCooldown { remaining } => {
                write!(f, "battle available in {remaining}s")
            }
            Rejection::Unregistered => write!(f, "account is not registered"),
            Rejection::NoBuildings => write!(f, "account has no buildings"),
        }
    }
}

impl std::error::Error for Rejection {}
