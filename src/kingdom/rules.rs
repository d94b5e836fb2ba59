//! Contract constants: building stats, exchange rates and battle timing.
//!
//! `Rules::default()` mirrors the deployed contract. A JSON file with the same
//! shape can override any field, e.g. for a fork or a test deployment:
//!
//! ```json
//! { "buildings": { "1": { "cost": 10000, "perHour": 8 } }, "battleCooldown": 3600 }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Upgrades a single building can receive.
pub const MAX_UPGRADES: u8 = 9;

/// Address of the Kingdom contract on BSC mainnet.
pub const CONTRACT_ADDRESS: &str = "0x864ee1d1b51306e30836b84ade81e39ebb6e8e0c";

/// BSC mainnet chain id.
pub const BSC_CHAIN_ID: u64 = 56;

/// Cost and yield of one building level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingStats {
    /// Gold cost to place the building.
    pub cost: u32,
    /// Gold and gems produced per hour.
    pub per_hour: u32,
}

impl BuildingStats {
    /// Cost of one upgrade: a quarter of the base cost, rounded down.
    #[must_use]
    pub const fn upgrade_cost(self) -> u32 {
        self.cost / 4
    }

    /// Yield added by one upgrade: a quarter of the base yield, rounded down.
    #[must_use]
    pub const fn upgrade_per_hour(self) -> u32 {
        self.per_hour / 4
    }
}

/// Building stats keyed by level.
pub type StatsTable = BTreeMap<u8, BuildingStats>;

/// Level stats of the deployed contract, levels 1-8.
const DEFAULT_BUILDINGS: [(u8, u32, u32); 8] = [
    (1, 10_000, 8),
    (2, 28_000, 24),
    (3, 54_000, 48),
    (4, 100_000, 96),
    (5, 250_000, 248),
    (6, 500_000, 520),
    (7, 1_000_000, 1_100),
    (8, 2_000_000, 2_300),
];

/// Contract rules used by the guards and previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rules {
    /// Stats per building level.
    pub buildings: StatsTable,
    /// Gold received per gem in `swapGemsToGold`.
    pub gems_to_gold_rate: u32,
    /// Gems that sell for one BNB.
    pub gems_per_bnb: u64,
    /// Seconds between battles.
    pub battle_cooldown: u32,
    /// Contract address.
    pub contract_address: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            buildings: DEFAULT_BUILDINGS
                .iter()
                .map(|&(level, cost, per_hour)| (level, BuildingStats { cost, per_hour }))
                .collect(),
            gems_to_gold_rate: 2,
            gems_per_bnb: 1_000_000,
            battle_cooldown: 86_400,
            contract_address: CONTRACT_ADDRESS.to_string(),
            chain_id: BSC_CHAIN_ID,
        }
    }
}

impl Rules {
    /// Stats for a building level.
    #[must_use]
    pub fn stats(&self, level: u8) -> Option<BuildingStats> {
        self.buildings.get(&level).copied()
    }

    /// Parse rules from JSON. Missing fields keep their default.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load rules from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let rules = Self::from_json(&text)?;
        log::debug!(
            "loaded rules from {}: {} building levels",
            path.display(),
            rules.buildings.len()
        );
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let rules = Rules::default();
        assert_eq!(rules.buildings.len(), 8);
        assert_eq!(
            rules.stats(5),
            Some(BuildingStats {
                cost: 250_000,
                per_hour: 248
            })
        );
        assert_eq!(rules.stats(0), None);
        assert_eq!(rules.stats(9), None);
    }

    #[test]
    fn test_upgrade_stats_round_down() {
        let stats = BuildingStats {
            cost: 54_001,
            per_hour: 7,
        };
        assert_eq!(stats.upgrade_cost(), 13_500);
        assert_eq!(stats.upgrade_per_hour(), 1);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let rules = Rules::from_json(r#"{"battleCooldown": 60, "buildings": {"1": {"cost": 5, "perHour": 1}}}"#)
            .unwrap();
        assert_eq!(rules.battle_cooldown, 60);
        assert_eq!(rules.buildings.len(), 1);
        assert_eq!(rules.stats(1).unwrap().cost, 5);
        assert_eq!(rules.gems_to_gold_rate, 2);
        assert_eq!(rules.chain_id, BSC_CHAIN_ID);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Rules::load(Path::new("/nonexistent/rules.json")).is_err());
    }
}
