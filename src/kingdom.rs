//! Kingdom contract model.
//!
//! - Tile codec for the packed `uint8[360]` board
//! - Theoretical accrual projection between on-chain claims
//! - Pending build selection and write guards
//! - Battle cooldown and reward preview, gem exchange previews
//! - Snapshot normalization from the contract-read layer

mod battle;
mod exchange;
mod guards;
mod live;
mod rules;
mod selection;
mod snapshot;
mod theory;
mod tiles;

pub use battle::{
    BattleReadiness, DEFAULT_WIN_CHANCE, MAX_WIN_CHANCE, MIN_WIN_CHANCE, RewardPreview, Risk,
    WinChance, battle_readiness, reward_preview, seconds_until_battle,
};
pub use exchange::{WEI_PER_BNB, format_bnb, gems_to_gold, gems_to_wei, wei_to_usd};
pub use guards::{
    BuildQuote, ContractCall, authorize_battle, authorize_build, authorize_sell, authorize_swap,
    authorize_upgrade, quote_build,
};
pub use live::LiveTheory;
pub use rules::{BSC_CHAIN_ID, BuildingStats, CONTRACT_ADDRESS, MAX_UPGRADES, Rules, StatsTable};
pub use selection::TileSelection;
pub use snapshot::{
    KingdomSnapshot, MAX_SAFE_INTEGER, RawKingdom, RawUint, SnapshotError, ZERO_ADDRESS,
    normalize_uint,
};
pub use theory::{ProjectedTheory, SECONDS_PER_HOUR, calculate_theory, hours_passed, project};
pub use tiles::{
    BuildingUpgradeInfo, MAX_TILE_ID, TILE_COUNT, TileBoard, TileId, TileInfo, decode_tile,
    find_next_free, level_of, parse_buildings_for_upgrade, parse_tiles, upgrades_of,
    validate_tile_selection,
};
