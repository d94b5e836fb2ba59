//! Client-side guards for contract writes.
//!
//! Every guard takes the snapshot current at submission time and the clock,
//! projects balances itself, and returns either the validated call or a
//! [`Rejection`]. Nothing here submits anything; the contract remains the
//! final authority.

use serde::Serialize;

use crate::error::{Rejection, Resource};
use crate::kingdom::battle::{WinChance, battle_readiness};
use crate::kingdom::rules::{MAX_UPGRADES, Rules};
use crate::kingdom::selection::TileSelection;
use crate::kingdom::theory::{ProjectedTheory, project};
use crate::kingdom::tiles::{MAX_TILE_ID, TileBoard, TileId};
use crate::kingdom::KingdomSnapshot;

/// A validated contract call, ready for the write-submission layer.
///
/// Serializes as `{"function": "<name>", "args": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "function",
    content = "args",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ContractCall {
    /// `placeBuildings(uint16[] _tileIds, uint8 _level)`.
    PlaceBuildings {
        /// Target tiles.
        tile_ids: Vec<TileId>,
        /// Building level.
        level: u8,
    },
    /// `upgradeBuilding(uint16 _tileId)`.
    UpgradeBuilding {
        /// Target tile.
        tile_id: TileId,
    },
    /// `sellGems(uint256 _gems)`.
    SellGems {
        /// Gems to sell for BNB.
        gems: u64,
    },
    /// `swapGemsToGold(uint256 _gems)`.
    SwapGemsToGold {
        /// Gems to swap.
        gems: u64,
    },
    /// `battle(uint8 winChance)`.
    Battle {
        /// Win chance in `40..=60`.
        win_chance: u8,
    },
}

impl ContractCall {
    /// Solidity function name.
    #[must_use]
    pub const fn function_name(&self) -> &'static str {
        match self {
            ContractCall::PlaceBuildings { .. } => "placeBuildings",
            ContractCall::UpgradeBuilding { .. } => "upgradeBuilding",
            ContractCall::SellGems { .. } => "sellGems",
            ContractCall::SwapGemsToGold { .. } => "swapGemsToGold",
            ContractCall::Battle { .. } => "battle",
        }
    }
}

/// Cost and yield of building `count` tiles at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildQuote {
    /// Building level.
    pub level: u8,
    /// Number of tiles.
    pub count: u64,
    /// Total gold cost.
    pub total_cost: u64,
    /// Total per-hour yield added.
    pub total_yield: u64,
}

impl BuildQuote {
    /// Whether the projected gold covers the quote.
    #[must_use]
    pub const fn is_affordable(&self, theory: &ProjectedTheory) -> bool {
        self.total_cost <= theory.gold_theory
    }
}

/// Quote a batch build. `None` if the level has no stats entry.
#[must_use]
pub fn quote_build(level: u8, count: usize, rules: &Rules) -> Option<BuildQuote> {
    let stats = rules.stats(level)?;
    let count = count as u64;
    Some(BuildQuote {
        level,
        count,
        total_cost: u64::from(stats.cost).saturating_mul(count),
        total_yield: u64::from(stats.per_hour).saturating_mul(count),
    })
}

fn require_balance(resource: Resource, required: u64, available: u64) -> Result<(), Rejection> {
    if required > available {
        return Err(Rejection::InsufficientBalance {
            resource,
            required,
            available,
        });
    }
    Ok(())
}

/// Guard a batch build.
///
/// Re-checks every selected tile against the snapshot, since a tile may have
/// been built on after it was selected.
///
/// # Errors
///
/// Returns a [`Rejection`] for an empty selection, an unknown level, a tile
/// that is now occupied, or a cost above projected gold.
pub fn authorize_build(
    snapshot: &KingdomSnapshot,
    selection: &TileSelection,
    level: u8,
    rules: &Rules,
    now: u64,
) -> Result<ContractCall, Rejection> {
    if selection.is_empty() {
        return Err(Rejection::EmptySelection);
    }
    let quote = quote_build(level, selection.len(), rules).ok_or(Rejection::UnknownLevel(level))?;

    let board = TileBoard::parse(&snapshot.tiles);
    if let Some(&taken) = selection.tiles().iter().find(|&&id| board.is_occupied(id)) {
        return Err(Rejection::TileOccupied(taken));
    }

    let theory = project(snapshot, now);
    require_balance(Resource::Gold, quote.total_cost, theory.gold_theory)?;

    Ok(ContractCall::PlaceBuildings {
        tile_ids: selection.tiles().to_vec(),
        level,
    })
}

/// Guard a building upgrade.
///
/// # Errors
///
/// Returns a [`Rejection`] if the tile is out of range or empty, the building
/// is fully upgraded or its level unknown, or the cost exceeds projected gold.
pub fn authorize_upgrade(
    snapshot: &KingdomSnapshot,
    tile_id: TileId,
    rules: &Rules,
    now: u64,
) -> Result<ContractCall, Rejection> {
    if tile_id > MAX_TILE_ID {
        return Err(Rejection::TileOutOfRange(tile_id));
    }
    let board = TileBoard::parse(&snapshot.tiles);
    let building = board.get(tile_id).ok_or(Rejection::TileEmpty(tile_id))?;

    if building.upgrades >= MAX_UPGRADES {
        return Err(Rejection::MaxUpgrades(tile_id));
    }
    let stats = rules
        .stats(building.level)
        .ok_or(Rejection::UnknownLevel(building.level))?;

    let theory = project(snapshot, now);
    require_balance(Resource::Gold, u64::from(stats.upgrade_cost()), theory.gold_theory)?;

    Ok(ContractCall::UpgradeBuilding { tile_id })
}

fn check_gems(snapshot: &KingdomSnapshot, gems: u64, now: u64) -> Result<(), Rejection> {
    if gems == 0 {
        return Err(Rejection::NonPositiveAmount);
    }
    let theory = project(snapshot, now);
    require_balance(Resource::Gems, gems, theory.gems_theory)
}

/// Guard selling gems for BNB.
///
/// # Errors
///
/// Returns a [`Rejection`] for zero gems or more than the projected gems.
pub fn authorize_sell(
    snapshot: &KingdomSnapshot,
    gems: u64,
    now: u64,
) -> Result<ContractCall, Rejection> {
    check_gems(snapshot, gems, now)?;
    Ok(ContractCall::SellGems { gems })
}

/// Guard swapping gems for gold.
///
/// # Errors
///
/// Returns a [`Rejection`] for zero gems or more than the projected gems.
pub fn authorize_swap(
    snapshot: &KingdomSnapshot,
    gems: u64,
    now: u64,
) -> Result<ContractCall, Rejection> {
    check_gems(snapshot, gems, now)?;
    Ok(ContractCall::SwapGemsToGold { gems })
}

/// Guard a battle.
///
/// The win chance is already range-checked by [`WinChance`].
///
/// # Errors
///
/// Returns a [`Rejection`] while the cooldown runs, for an account without
/// buildings, or for an unregistered account.
pub fn authorize_battle(
    snapshot: &KingdomSnapshot,
    win_chance: WinChance,
    rules: &Rules,
    now: u64,
) -> Result<ContractCall, Rejection> {
    if let Some(blocker) = battle_readiness(snapshot, rules, now).blocker() {
        return Err(blocker);
    }
    Ok(ContractCall::Battle {
        win_chance: win_chance.get(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn snapshot(gold: u32, gems: u32) -> KingdomSnapshot {
        KingdomSnapshot {
            gold,
            gems,
            per_hour: 10,
            // Claimed in the current hour, so nothing accrued yet
            claim_time: NOW as u32,
            ..KingdomSnapshot::default()
        }
    }

    fn selection(ids: &[i64], snapshot: &KingdomSnapshot) -> TileSelection {
        let board = TileBoard::parse(&snapshot.tiles);
        let mut selection = TileSelection::new();
        for &id in ids {
            selection.add(id, &board).unwrap();
        }
        selection
    }

    #[test]
    fn test_quote_build() {
        let quote = quote_build(3, 4, &Rules::default()).unwrap();
        assert_eq!(quote.total_cost, 216_000);
        assert_eq!(quote.total_yield, 192);
        assert!(quote_build(9, 1, &Rules::default()).is_none());
    }

    #[test]
    fn test_build_authorized_at_exact_balance() {
        let s = snapshot(20_000, 0);
        let call = authorize_build(&s, &selection(&[0, 1], &s), 1, &Rules::default(), NOW).unwrap();
        assert_eq!(
            call,
            ContractCall::PlaceBuildings {
                tile_ids: vec![0, 1],
                level: 1
            }
        );
    }

    #[test]
    fn test_build_counts_projected_gold() {
        let mut s = snapshot(19_990, 0);
        let selected = selection(&[0, 1], &s);
        assert_eq!(
            authorize_build(&s, &selected, 1, &Rules::default(), NOW),
            Err(Rejection::InsufficientBalance {
                resource: Resource::Gold,
                required: 20_000,
                available: 19_990
            })
        );

        // One hour later the accrual covers the gap
        s.claim_time -= 3_600;
        assert!(authorize_build(&s, &selected, 1, &Rules::default(), NOW).is_ok());
    }

    #[test]
    fn test_build_rejects_stale_selection() {
        let mut s = snapshot(1_000_000, 0);
        let selected = selection(&[4, 5], &s);
        s.tiles[5] = 2;
        assert_eq!(
            authorize_build(&s, &selected, 1, &Rules::default(), NOW),
            Err(Rejection::TileOccupied(5))
        );
    }

    #[test]
    fn test_build_rejects_empty_and_unknown_level() {
        let s = snapshot(1_000_000, 0);
        let rules = Rules::default();
        assert_eq!(
            authorize_build(&s, &TileSelection::new(), 1, &rules, NOW),
            Err(Rejection::EmptySelection)
        );
        assert_eq!(
            authorize_build(&s, &selection(&[0], &s), 0, &rules, NOW),
            Err(Rejection::UnknownLevel(0))
        );
    }

    #[test]
    fn test_upgrade_guard() {
        let mut s = snapshot(2_500, 0);
        s.tiles[7] = 1; // level 1, cost 10_000 → upgrade 2_500
        s.tiles[8] = 91; // level 1, fully upgraded
        let rules = Rules::default();

        assert_eq!(
            authorize_upgrade(&s, 7, &rules, NOW),
            Ok(ContractCall::UpgradeBuilding { tile_id: 7 })
        );
        assert_eq!(authorize_upgrade(&s, 8, &rules, NOW), Err(Rejection::MaxUpgrades(8)));
        assert_eq!(authorize_upgrade(&s, 9, &rules, NOW), Err(Rejection::TileEmpty(9)));
        assert_eq!(
            authorize_upgrade(&s, 360, &rules, NOW),
            Err(Rejection::TileOutOfRange(360))
        );

        s.gold = 2_499;
        assert!(matches!(
            authorize_upgrade(&s, 7, &rules, NOW),
            Err(Rejection::InsufficientBalance { required: 2_500, .. })
        ));
    }

    #[test]
    fn test_sell_and_swap_guards() {
        let s = snapshot(0, 100);
        assert_eq!(authorize_sell(&s, 100, NOW), Ok(ContractCall::SellGems { gems: 100 }));
        assert_eq!(authorize_sell(&s, 0, NOW), Err(Rejection::NonPositiveAmount));
        assert!(matches!(
            authorize_sell(&s, 101, NOW),
            Err(Rejection::InsufficientBalance {
                resource: Resource::Gems,
                ..
            })
        ));
        assert_eq!(
            authorize_swap(&s, 40, NOW),
            Ok(ContractCall::SwapGemsToGold { gems: 40 })
        );
    }

    #[test]
    fn test_battle_guard() {
        let s = snapshot(0, 0);
        let rules = Rules::default();
        assert_eq!(
            authorize_battle(&s, WinChance::default(), &rules, NOW),
            Ok(ContractCall::Battle { win_chance: 50 })
        );

        let mut cooling = s.clone();
        cooling.battle_time = NOW as u32;
        assert!(matches!(
            authorize_battle(&cooling, WinChance::default(), &rules, NOW),
            Err(Rejection::BattleCooldown { remaining: 86_400 })
        ));
    }

    #[test]
    fn test_call_serialization() {
        let call = ContractCall::PlaceBuildings {
            tile_ids: vec![3, 9],
            level: 2,
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"function": "placeBuildings", "args": {"tileIds": [3, 9], "level": 2}})
        );
        assert_eq!(call.function_name(), "placeBuildings");

        let json = serde_json::to_value(ContractCall::Battle { win_chance: 45 }).unwrap();
        assert_eq!(json["args"]["winChance"], 45);
    }
}
