//! Battle command implementation.

use super::output::{format_countdown, format_timestamp, group_thousands};
use super::{CliError, Context, OutputFormat, load_snapshot, print_json};
use kingdom::kingdom::{BattleReadiness, RewardPreview, battle_readiness, reward_preview};
use kingdom::{KingdomSnapshot, WinChance};
use serde::Serialize;
use std::path::PathBuf;

/// JSON view of the battle panel.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBattle {
    readiness: BattleReadiness,
    can_battle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocker: Option<String>,
    battle_id: u16,
    battles_in_row: u8,
    is_win_in_row: bool,
    risk: String,
    preview: RewardPreview,
}

/// Execute the battle command.
///
/// Out-of-range win chances are clamped the way the input form clamps them.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded.
pub(crate) fn execute(
    ctx: &Context,
    snapshot: PathBuf,
    win_chance: i64,
    format: OutputFormat,
) -> Result<(), CliError> {
    let snapshot = load_snapshot(&snapshot)?;
    let now = ctx.now();
    let win_chance = WinChance::clamped(win_chance);
    let readiness = battle_readiness(&snapshot, &ctx.rules, now);
    let preview = reward_preview(&snapshot, win_chance);

    match format {
        OutputFormat::Text => print!(
            "{}",
            format_battle(&snapshot, &readiness, &preview, win_chance, now)
        ),
        OutputFormat::Json => print_json(&JsonBattle {
            readiness,
            can_battle: readiness.can_battle(),
            blocker: readiness.blocker().map(|b| b.to_string()),
            battle_id: snapshot.battle_id,
            battles_in_row: snapshot.battles_in_row,
            is_win_in_row: snapshot.is_win_in_row,
            risk: win_chance.risk().to_string(),
            preview,
        })?,
    }

    Ok(())
}

fn format_battle(
    snapshot: &KingdomSnapshot,
    readiness: &BattleReadiness,
    preview: &RewardPreview,
    win_chance: WinChance,
    now: u64,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Next battle:  {}\n",
        format_countdown(readiness.seconds_remaining)
    ));
    if readiness.seconds_remaining > 0 {
        output.push_str(&format!(
            "  ready at    {}\n",
            format_timestamp(now.saturating_add(readiness.seconds_remaining))
        ));
    }
    match readiness.blocker() {
        None => output.push_str("Status:       ready\n"),
        Some(blocker) => output.push_str(&format!("Status:       blocked ({blocker})\n")),
    }

    if snapshot.battles_in_row > 0 {
        let kind = if snapshot.is_win_in_row { "win" } else { "loss" };
        output.push_str(&format!(
            "Streak:       {} {kind}(s) in a row\n",
            snapshot.battles_in_row
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Win chance {}%: {}\n",
        win_chance.get(),
        win_chance.risk()
    ));
    output.push_str(&format!("  Win:  +{} gold\n", group_thousands(preview.win)));
    if preview.guaranteed_win {
        output.push_str("  Lose: first battle of a streak always wins\n");
    } else {
        output.push_str(&format!("  Lose: +{} gold\n", group_thousands(preview.lose)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingdom::Rules;

    const NOW: u64 = 1_700_000_000;

    #[test]
    fn test_format_ready_battle() {
        let snapshot = KingdomSnapshot {
            per_hour: 100,
            claim_time: 1,
            ..KingdomSnapshot::default()
        };
        let readiness = battle_readiness(&snapshot, &Rules::default(), NOW);
        let preview = reward_preview(&snapshot, WinChance::default());
        let text = format_battle(&snapshot, &readiness, &preview, WinChance::default(), NOW);

        assert!(text.contains("Next battle:  available"));
        assert!(text.contains("Status:       ready"));
        assert!(text.contains("Win:  +1 600 gold"));
        assert!(text.contains("always wins"));
    }

    #[test]
    fn test_format_cooling_battle() {
        let snapshot = KingdomSnapshot {
            per_hour: 100,
            claim_time: 1,
            battle_time: (NOW - 3_600) as u32,
            battles_in_row: 2,
            is_win_in_row: true,
            ..KingdomSnapshot::default()
        };
        let readiness = battle_readiness(&snapshot, &Rules::default(), NOW);
        let preview = reward_preview(&snapshot, WinChance::clamped(10));
        let text = format_battle(&snapshot, &readiness, &preview, WinChance::clamped(10), NOW);

        assert!(text.contains("Next battle:  23h 0m 0s"));
        assert!(text.contains("blocked"));
        assert!(text.contains("2 win(s) in a row"));
        assert!(text.contains("Win chance 40%"));
        assert!(text.contains("Lose: +800 gold"));
    }
}
