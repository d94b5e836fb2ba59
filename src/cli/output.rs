//! Output formatting utilities for CLI.

use chrono::DateTime;
use kingdom::{KingdomSnapshot, ProjectedTheory, TileId};
use serde::Serialize;

/// Group digits in threes with spaces: `1234567` → `1 234 567`.
pub(super) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(' ');
        }
        output.push(ch);
    }
    output
}

/// Format a unix timestamp as `dd.mm.yyyy HH:MM UTC`.
pub(super) fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || timestamp.to_string(),
            |dt| dt.format("%d.%m.%Y %H:%M UTC").to_string(),
        )
}

/// Format a claim timestamp, or `never` for 0.
pub(super) fn format_claim_time(timestamp: u32) -> String {
    if timestamp == 0 {
        return "never".to_string();
    }
    format_timestamp(u64::from(timestamp))
}

/// Format a countdown: `2h 5m 9s`, `5m 9s`, `9s`, or `available` at zero.
pub(super) fn format_countdown(seconds: u64) -> String {
    if seconds == 0 {
        return "available".to_string();
    }
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Collapse ascending tile ids into ranges: `0-4, 6, 8-10`.
pub(super) fn format_ranges(ids: &[TileId]) -> String {
    let mut parts = Vec::new();
    let mut iter = ids.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
    }
    parts.join(", ")
}

/// JSON-serializable projection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JsonTheory {
    /// Clock the projection is for.
    pub(super) now: u64,
    /// Stored gold.
    pub(super) gold: u32,
    /// Stored gems.
    pub(super) gems: u32,
    /// Combined per-hour accrual.
    pub(super) per_hour: u32,
    /// Last settlement.
    pub(super) claim_time: u32,
    /// Whether the account has ever settled.
    pub(super) registered: bool,
    /// Projected balances.
    pub(super) theory: ProjectedTheory,
}

impl JsonTheory {
    /// Create from a snapshot and its projection.
    pub(super) fn new(snapshot: &KingdomSnapshot, theory: ProjectedTheory, now: u64) -> Self {
        Self {
            now,
            gold: snapshot.gold,
            gems: snapshot.gems,
            per_hour: snapshot.per_hour,
            claim_time: snapshot.claim_time,
            registered: snapshot.is_registered(),
            theory,
        }
    }
}

/// Format a projection as human-readable text.
pub(super) fn format_theory(snapshot: &KingdomSnapshot, theory: &ProjectedTheory) -> String {
    let mut output = String::new();

    if !snapshot.is_registered() {
        output.push_str("  (account not registered: projection counts from the epoch)\n");
    }
    output.push_str(&format!(
        "  Storage:      gold {}  gems {}\n",
        group_thousands(u64::from(snapshot.gold)),
        group_thousands(u64::from(snapshot.gems))
    ));
    output.push_str(&format!(
        "  Per hour:     {}\n",
        group_thousands(u64::from(snapshot.per_hour))
    ));
    output.push_str(&format!(
        "  Last claim:   {}\n",
        format_claim_time(snapshot.claim_time)
    ));
    output.push_str(&format!("  Hours passed: {}\n", theory.hours_passed));
    output.push_str(&format!("  Earned:       +{}\n", group_thousands(theory.earned)));
    output.push_str(&format!(
        "  Theory:       gold {}  gems {}\n",
        group_thousands(theory.gold_theory),
        group_thousands(theory.gems_theory)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1 000");
        assert_eq!(group_thousands(2_000_000), "2 000 000");
        assert_eq!(group_thousands(12_345_678), "12 345 678");
    }

    #[test]
    fn test_format_claim_time() {
        assert_eq!(format_claim_time(0), "never");
        assert_eq!(format_claim_time(1_700_000_000), "14.11.2023 22:13 UTC");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "available");
        assert_eq!(format_countdown(9), "9s");
        assert_eq!(format_countdown(309), "5m 9s");
        assert_eq!(format_countdown(7_509), "2h 5m 9s");
    }

    #[test]
    fn test_format_ranges() {
        assert_eq!(format_ranges(&[]), "");
        assert_eq!(format_ranges(&[0, 1, 2, 3, 4, 6, 8, 9, 10]), "0-4, 6, 8-10");
        assert_eq!(format_ranges(&[359]), "359");
    }

    #[test]
    fn test_format_theory_mentions_unregistered() {
        let snapshot = KingdomSnapshot::default();
        let text = format_theory(&snapshot, &kingdom::project(&snapshot, 18_000));
        assert!(text.contains("not registered"));
        assert!(text.contains("Last claim:   never"));
    }
}
