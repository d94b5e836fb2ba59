//! Theoretical accrual: balances the contract would settle if claimed now.
//!
//! The contract accrues in whole hours, counted as hour boundaries crossed
//! since the last claim:
//!
//! ```text
//! hours  = max(0, floor(now / 3600) - floor(claimTime / 3600))
//! earned = hours × perHour
//! gold'  = gold + earned
//! gems'  = gems + earned
//! ```
//!
//! Gold and gems accrue at the same combined rate. This is the contract's own
//! settlement rule.

use serde::Serialize;

use crate::kingdom::KingdomSnapshot;

/// Seconds in one accrual period.
pub const SECONDS_PER_HOUR: u64 = 3_600;

/// Projected balances at a point in time. Recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedTheory {
    /// Hour boundaries crossed since the last claim.
    pub hours_passed: u64,
    /// Accrued amount, added to both balances.
    pub earned: u64,
    /// Projected gold.
    pub gold_theory: u64,
    /// Projected gems.
    pub gems_theory: u64,
}

/// Hour boundaries crossed between `claim_time` and `now`; 0 if `now` is
/// earlier.
#[must_use]
#[inline]
pub const fn hours_passed(claim_time: u32, now: u64) -> u64 {
    (now / SECONDS_PER_HOUR).saturating_sub(claim_time as u64 / SECONDS_PER_HOUR)
}

/// Project balances from individual fields.
#[must_use]
pub const fn calculate_theory(
    gold: u32,
    gems: u32,
    per_hour: u32,
    claim_time: u32,
    now: u64,
) -> ProjectedTheory {
    let hours_passed = hours_passed(claim_time, now);
    let earned = hours_passed.saturating_mul(per_hour as u64);

    ProjectedTheory {
        hours_passed,
        earned,
        gold_theory: (gold as u64).saturating_add(earned),
        gems_theory: (gems as u64).saturating_add(earned),
    }
}

/// Project a snapshot to `now` (unix seconds).
///
/// `claimTime == 0` is not special-cased: an unregistered account projects a
/// large hour count. Use [`KingdomSnapshot::is_registered`] for gating.
#[must_use]
pub fn project(snapshot: &KingdomSnapshot, now: u64) -> ProjectedTheory {
    calculate_theory(
        snapshot.gold,
        snapshot.gems,
        snapshot.per_hour,
        snapshot.claim_time,
        now,
    )
}

/// Kani proofs for the accrual arithmetic.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Projection never panics and keeps both balances at or above storage.
    #[kani::proof]
    fn prove_projection_total() {
        let gold: u32 = kani::any();
        let gems: u32 = kani::any();
        let per_hour: u32 = kani::any();
        let claim_time: u32 = kani::any();
        let now: u64 = kani::any();

        let theory = calculate_theory(gold, gems, per_hour, claim_time, now);

        assert!(theory.gold_theory >= u64::from(gold));
        assert!(theory.gems_theory >= u64::from(gems));
    }

    /// A clock behind the claim never accrues.
    #[kani::proof]
    fn prove_clamp_before_claim() {
        let claim_time: u32 = kani::any();
        let now: u64 = kani::any();
        kani::assume(now < u64::from(claim_time));

        assert_eq!(hours_passed(claim_time, now), 0);
    }

    /// Later clocks never earn less.
    #[kani::proof]
    fn prove_monotonic() {
        let claim_time: u32 = kani::any();
        let per_hour: u32 = kani::any();
        let t1: u64 = kani::any();
        let t2: u64 = kani::any();
        kani::assume(t1 <= t2);

        let a = calculate_theory(0, 0, per_hour, claim_time, t1);
        let b = calculate_theory(0, 0, per_hour, claim_time, t2);
        assert!(a.earned <= b.earned);
    }
}
