//! Battle cooldown, win-chance parameter and reward preview.
//!
//! Reward rules of the contract:
//! - win: `perHour × 16 × 50 / winChance` (rounded down)
//! - lose: `perHour × 8`
//! - the first battle of a streak always wins

use std::fmt;

use serde::Serialize;

use crate::error::Rejection;
use crate::kingdom::KingdomSnapshot;
use crate::kingdom::rules::Rules;

/// Lowest win chance the contract accepts.
pub const MIN_WIN_CHANCE: u8 = 40;

/// Highest win chance the contract accepts.
pub const MAX_WIN_CHANCE: u8 = 60;

/// Win chance the dashboard suggests.
pub const DEFAULT_WIN_CHANCE: u8 = 50;

/// Risk band of a win-chance choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Risk {
    /// 40: highest risk, largest reward.
    Highest,
    /// 41-49.
    Medium,
    /// 50: the recommended balance.
    Balanced,
    /// 51-59.
    Low,
    /// 60: lowest risk, smallest reward.
    Minimal,
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Risk::Highest => "high risk, maximum reward",
            Risk::Medium => "medium risk",
            Risk::Balanced => "balanced (recommended)",
            Risk::Low => "low risk",
            Risk::Minimal => "minimal risk, minimum reward",
        };
        f.write_str(label)
    }
}

/// Win chance accepted by `battle(uint8)`, always in `40..=60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WinChance(u8);

impl Default for WinChance {
    fn default() -> Self {
        Self(DEFAULT_WIN_CHANCE)
    }
}

impl WinChance {
    /// Accept a win chance inside `40..=60`.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::WinChanceOutOfRange`] for anything else.
    pub fn new(value: i64) -> Result<Self, Rejection> {
        u8::try_from(value)
            .ok()
            .filter(|v| (MIN_WIN_CHANCE..=MAX_WIN_CHANCE).contains(v))
            .map(Self)
            .ok_or(Rejection::WinChanceOutOfRange(value))
    }

    /// Clamp any input into `40..=60`, the way the input form does.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(MIN_WIN_CHANCE), i64::from(MAX_WIN_CHANCE)) as u8)
    }

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Risk band of this choice.
    #[must_use]
    pub const fn risk(self) -> Risk {
        match self.0 {
            MIN_WIN_CHANCE => Risk::Highest,
            DEFAULT_WIN_CHANCE => Risk::Balanced,
            MAX_WIN_CHANCE => Risk::Minimal,
            v if v < DEFAULT_WIN_CHANCE => Risk::Medium,
            _ => Risk::Low,
        }
    }
}

/// Seconds until the cooldown after the last battle elapses; 0 when ready.
#[must_use]
pub fn seconds_until_battle(snapshot: &KingdomSnapshot, cooldown: u32, now: u64) -> u64 {
    (u64::from(snapshot.battle_time) + u64::from(cooldown)).saturating_sub(now)
}

/// What stands between the account and its next battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReadiness {
    /// Seconds left on the cooldown.
    pub seconds_remaining: u64,
    /// Account produces something per hour.
    pub has_buildings: bool,
    /// Account has settled on chain at least once.
    pub registered: bool,
}

impl BattleReadiness {
    /// Whether every condition for a battle holds.
    #[must_use]
    pub const fn can_battle(&self) -> bool {
        self.blocker().is_none()
    }

    /// First unmet condition, checked as cooldown, buildings, registration.
    #[must_use]
    pub const fn blocker(&self) -> Option<Rejection> {
        if self.seconds_remaining > 0 {
            Some(Rejection::BattleCooldown {
                remaining: self.seconds_remaining,
            })
        } else if !self.has_buildings {
            Some(Rejection::NoBuildings)
        } else if !self.registered {
            Some(Rejection::Unregistered)
        } else {
            None
        }
    }
}

/// Evaluate battle preconditions at `now`.
#[must_use]
pub fn battle_readiness(snapshot: &KingdomSnapshot, rules: &Rules, now: u64) -> BattleReadiness {
    BattleReadiness {
        seconds_remaining: seconds_until_battle(snapshot, rules.battle_cooldown, now),
        has_buildings: snapshot.per_hour > 0,
        registered: snapshot.is_registered(),
    }
}

/// Potential outcome of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPreview {
    /// Win chance the preview was computed for.
    pub win_chance: u8,
    /// Gold on a win.
    pub win: u64,
    /// Gold on a loss.
    pub lose: u64,
    /// First battle of a streak cannot be lost.
    pub guaranteed_win: bool,
}

/// Preview rewards for a win chance.
#[must_use]
pub fn reward_preview(snapshot: &KingdomSnapshot, win_chance: WinChance) -> RewardPreview {
    let per_hour = u64::from(snapshot.per_hour);
    RewardPreview {
        win_chance: win_chance.get(),
        win: per_hour * 16 * 50 / u64::from(win_chance.get()),
        lose: per_hour * 8,
        guaranteed_win: snapshot.battles_in_row == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(per_hour: u32, claim_time: u32, battle_time: u32) -> KingdomSnapshot {
        KingdomSnapshot {
            per_hour,
            claim_time,
            battle_time,
            ..KingdomSnapshot::default()
        }
    }

    #[test]
    fn test_win_chance_range() {
        assert_eq!(WinChance::new(40).unwrap().get(), 40);
        assert_eq!(WinChance::new(60).unwrap().get(), 60);
        assert_eq!(WinChance::new(39), Err(Rejection::WinChanceOutOfRange(39)));
        assert_eq!(WinChance::new(61), Err(Rejection::WinChanceOutOfRange(61)));
        assert_eq!(WinChance::new(-50), Err(Rejection::WinChanceOutOfRange(-50)));
        assert_eq!(WinChance::new(296), Err(Rejection::WinChanceOutOfRange(296)));
        assert_eq!(WinChance::default().get(), 50);
    }

    #[test]
    fn test_win_chance_clamped() {
        assert_eq!(WinChance::clamped(10).get(), 40);
        assert_eq!(WinChance::clamped(1_000).get(), 60);
        assert_eq!(WinChance::clamped(45).get(), 45);
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(WinChance::clamped(40).risk(), Risk::Highest);
        assert_eq!(WinChance::clamped(45).risk(), Risk::Medium);
        assert_eq!(WinChance::clamped(50).risk(), Risk::Balanced);
        assert_eq!(WinChance::clamped(55).risk(), Risk::Low);
        assert_eq!(WinChance::clamped(60).risk(), Risk::Minimal);
    }

    #[test]
    fn test_cooldown_countdown() {
        let s = snapshot(8, 1, 1_000);
        assert_eq!(seconds_until_battle(&s, 86_400, 1_000), 86_400);
        assert_eq!(seconds_until_battle(&s, 86_400, 87_399), 1);
        assert_eq!(seconds_until_battle(&s, 86_400, 87_400), 0);
        assert_eq!(seconds_until_battle(&s, 86_400, 200_000), 0);
    }

    #[test]
    fn test_readiness_blockers() {
        let rules = Rules::default();
        let now = 1_000_000;

        let ready = battle_readiness(&snapshot(8, 1, 0), &rules, now);
        assert!(ready.can_battle());

        let cooling = battle_readiness(&snapshot(8, 1, 999_000), &rules, now);
        assert_eq!(
            cooling.blocker(),
            Some(Rejection::BattleCooldown { remaining: 85_400 })
        );

        let idle = battle_readiness(&snapshot(0, 1, 0), &rules, now);
        assert_eq!(idle.blocker(), Some(Rejection::NoBuildings));

        let fresh = battle_readiness(&snapshot(8, 0, 0), &rules, now);
        assert_eq!(fresh.blocker(), Some(Rejection::Unregistered));
    }

    #[test]
    fn test_reward_preview() {
        let mut s = snapshot(2_300, 1, 0);
        let preview = reward_preview(&s, WinChance::clamped(40));
        assert_eq!(preview.win, 46_000);
        assert_eq!(preview.lose, 18_400);
        assert!(preview.guaranteed_win);

        s.battles_in_row = 2;
        let preview = reward_preview(&s, WinChance::clamped(60));
        // 2300 * 800 / 60 = 30666.67
        assert_eq!(preview.win, 30_666);
        assert!(!preview.guaranteed_win);
    }
}
