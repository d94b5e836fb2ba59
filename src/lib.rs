// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Kingdom: client-side model of the Kingdom game contract on BSC.
//!
//! The contract settles balances only when a transaction touches the account.
//! Between transactions this crate predicts what the contract would settle,
//! decodes the packed tile board, and decides whether a write is worth
//! submitting:
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   View layer (CLI, 1 Hz refresh)    │
//! ├──────────────────┬──────────────────┤
//! │   Write guards   │   LiveTheory     │
//! ├──────────────────┼──────────────────┤
//! │   Tile codec     │   Projector      │
//! ├──────────────────┴──────────────────┤
//! │   Snapshot normalization            │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every function in the core is pure: the clock is always an explicit `now`
//! argument in unix seconds.

pub mod error;
pub mod kingdom;

pub use error::{Rejection, Resource, SelectionError};

// Re-export key types at crate root for convenience
pub use kingdom::{
    ContractCall, KingdomSnapshot, LiveTheory, ProjectedTheory, Rules, SnapshotError, TileBoard,
    TileId, TileSelection, WinChance, project,
};
