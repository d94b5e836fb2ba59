#![no_main]

use arbitrary::Arbitrary;
use kingdom::kingdom::{calculate_theory, reward_preview};
use kingdom::{KingdomSnapshot, WinChance};
use libfuzzer_sys::fuzz_target;

/// Structured input for projection fuzzing.
#[derive(Arbitrary, Debug)]
struct TheoryInput {
    gold: u32,
    gems: u32,
    per_hour: u32,
    claim_time: u32,
    now: u64,
    /// Seconds to advance for the monotonicity check.
    step: u32,
    win_chance: i64,
}

fuzz_target!(|input: TheoryInput| {
    let theory = calculate_theory(input.gold, input.gems, input.per_hour, input.claim_time, input.now);
    assert!(theory.gold_theory >= u64::from(input.gold));
    assert!(theory.gems_theory >= u64::from(input.gems));
    if u64::from(input.claim_time) >= input.now {
        assert_eq!(theory.hours_passed, 0);
    }

    let later = calculate_theory(
        input.gold,
        input.gems,
        input.per_hour,
        input.claim_time,
        input.now.saturating_add(u64::from(input.step)),
    );
    assert!(later.gold_theory >= theory.gold_theory);
    assert!(later.hours_passed >= theory.hours_passed);

    let snapshot = KingdomSnapshot {
        per_hour: input.per_hour,
        ..KingdomSnapshot::default()
    };
    let preview = reward_preview(&snapshot, WinChance::clamped(input.win_chance));
    assert!(preview.win >= preview.lose);
});
