//! On-chain kingdom snapshot and input normalization.
//!
//! The contract-read layer hands over `getKingdom` results as JSON where any
//! numeric field may be a plain number or a decimal string (big integers are
//! serialized as strings). Everything is normalized here, once, into the
//! fixed-width fields of [`KingdomSnapshot`].
//!
//! # Precision policy
//!
//! - Values above `2^53 - 1` log a warning and are rounded to the nearest
//!   double, the same approximation a JavaScript `Number` makes.
//! - A value that does not fit its field's contract width (`uint32`,
//!   `uint16`, `uint8`) is a [`SnapshotError::FieldOverflow`].

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::kingdom::tiles::TILE_COUNT;

/// Largest integer a double represents exactly.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Ally address of an account without an ally.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Error type for snapshot loading and normalization.
#[derive(Debug)]
pub enum SnapshotError {
    /// Numeric field is not a non-negative integer.
    InvalidNumber {
        /// Field name.
        field: String,
        /// Offending input.
        input: String,
    },
    /// Value does not fit the field's contract width.
    FieldOverflow {
        /// Field name.
        field: String,
        /// Normalized value.
        value: u64,
    },
    /// Input is not a well-formed kingdom record.
    Json(serde_json::Error),
    /// Snapshot file could not be read.
    Io(io::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber { field, input } => {
                write!(f, "{field}: {input:?} is not a non-negative integer")
            }
            Self::FieldOverflow { field, value } => {
                write!(f, "{field}: {value} does not fit the contract field")
            }
            Self::Json(e) => write!(f, "malformed kingdom record: {e}"),
            Self::Io(e) => write!(f, "failed to read snapshot: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InvalidNumber { .. } | Self::FieldOverflow { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// A numeric field as it arrives from the contract-read layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawUint {
    /// Native integer.
    Number(u64),
    /// Number that did not fit `u64` or carried a fraction.
    Float(f64),
    /// Decimal string, optionally with a trailing `n` (bigint literal).
    Text(String),
}

impl From<u64> for RawUint {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// Round an out-of-range value the way a double would, logging the loss.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn truncate_unsafe(field: &str, value: u128) -> u64 {
    if value <= u128::from(MAX_SAFE_INTEGER) {
        return value as u64;
    }
    log::warn!("{field}: value {value} exceeds the safe integer range, precision lost");
    // Saturates at u64::MAX.
    (value as f64) as u64
}

/// Normalize one numeric field to `u64`.
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidNumber`] for negative, fractional,
/// non-finite or non-numeric input.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_uint(field: &str, raw: &RawUint) -> Result<u64, SnapshotError> {
    let invalid = |input: String| SnapshotError::InvalidNumber {
        field: field.to_string(),
        input,
    };

    match raw {
        RawUint::Number(value) => Ok(truncate_unsafe(field, u128::from(*value))),
        RawUint::Float(value) => {
            if !value.is_finite() || *value < 0.0 || value.fract() != 0.0 {
                return Err(invalid(value.to_string()));
            }
            if *value > MAX_SAFE_INTEGER as f64 {
                log::warn!("{field}: value {value} exceeds the safe integer range, precision lost");
            }
            Ok(*value as u64)
        }
        RawUint::Text(text) => {
            let digits = text.trim();
            let digits = digits.strip_suffix('n').unwrap_or(digits);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(text.clone()));
            }
            let value = digits.parse::<u128>().map_err(|_| invalid(text.clone()))?;
            Ok(truncate_unsafe(field, value))
        }
    }
}

/// Normalize a field and narrow it to its contract width.
fn narrow<T: TryFrom<u64>>(field: &str, raw: &RawUint) -> Result<T, SnapshotError> {
    let value = normalize_uint(field, raw)?;
    T::try_from(value).map_err(|_| SnapshotError::FieldOverflow {
        field: field.to_string(),
        value,
    })
}

/// `getKingdom` result before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKingdom {
    /// Stored gold.
    pub gold: RawUint,
    /// Stored gems.
    pub gems: RawUint,
    /// Combined per-hour accrual.
    pub per_hour: RawUint,
    /// Number of allies.
    pub allies_count: RawUint,
    /// Gold earned through allies.
    pub allies_earned: RawUint,
    /// Last settlement (unix seconds).
    pub claim_time: RawUint,
    /// Last battle (unix seconds).
    pub battle_time: RawUint,
    /// Id of the last battle.
    pub battle_id: RawUint,
    /// Length of the current battle streak.
    pub battles_in_row: RawUint,
    /// Whether the streak is a winning one.
    pub is_win_in_row: bool,
    /// Ally address.
    #[serde(default)]
    pub ally: Option<String>,
    /// Packed tiles; `null` entries read as 0.
    pub tiles: Vec<Option<RawUint>>,
}

impl RawKingdom {
    /// Parse a raw record from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not have the `getKingdom` shape.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Authoritative kingdom state read at one point in time.
///
/// Never mutated after capture; a newer read replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KingdomSnapshot {
    /// Stored gold.
    pub gold: u32,
    /// Stored gems.
    pub gems: u32,
    /// Combined per-hour accrual for gold and gems.
    pub per_hour: u32,
    /// Number of allies.
    pub allies_count: u32,
    /// Gold earned through allies.
    pub allies_earned: u32,
    /// Last settlement (unix seconds), 0 if never claimed.
    pub claim_time: u32,
    /// Last battle (unix seconds).
    pub battle_time: u32,
    /// Id of the last battle.
    pub battle_id: u16,
    /// Length of the current battle streak.
    pub battles_in_row: u8,
    /// Whether the streak is a winning one.
    pub is_win_in_row: bool,
    /// Ally address.
    pub ally: String,
    /// Packed tile bytes.
    pub tiles: [u8; TILE_COUNT],
}

impl Default for KingdomSnapshot {
    fn default() -> Self {
        Self {
            gold: 0,
            gems: 0,
            per_hour: 0,
            allies_count: 0,
            allies_earned: 0,
            claim_time: 0,
            battle_time: 0,
            battle_id: 0,
            battles_in_row: 0,
            is_win_in_row: false,
            ally: ZERO_ADDRESS.to_string(),
            tiles: [0; TILE_COUNT],
        }
    }
}

impl KingdomSnapshot {
    /// Whether the account has ever settled on chain.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.claim_time != 0
    }

    /// Whether an ally is set.
    #[must_use]
    pub fn has_ally(&self) -> bool {
        !self.ally.is_empty() && !self.ally.eq_ignore_ascii_case(ZERO_ADDRESS)
    }

    /// Parse and normalize a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field fails
    /// normalization.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Self::try_from(RawKingdom::from_json(json)?)
    }

    /// Load and normalize a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or normalized.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl TryFrom<RawKingdom> for KingdomSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawKingdom) -> Result<Self, Self::Error> {
        if raw.tiles.len() > TILE_COUNT {
            log::debug!(
                "ignoring {} tile entries past index {}",
                raw.tiles.len() - TILE_COUNT,
                TILE_COUNT - 1
            );
        }

        let mut tiles = [0u8; TILE_COUNT];
        for (idx, entry) in raw.tiles.iter().take(TILE_COUNT).enumerate() {
            if let Some(value) = entry {
                tiles[idx] = narrow(&format!("tiles[{idx}]"), value)?;
            }
        }

        Ok(Self {
            gold: narrow("gold", &raw.gold)?,
            gems: narrow("gems", &raw.gems)?,
            per_hour: narrow("perHour", &raw.per_hour)?,
            allies_count: narrow("alliesCount", &raw.allies_count)?,
            allies_earned: narrow("alliesEarned", &raw.allies_earned)?,
            claim_time: narrow("claimTime", &raw.claim_time)?,
            battle_time: narrow("battleTime", &raw.battle_time)?,
            battle_id: narrow("battleId", &raw.battle_id)?,
            battles_in_row: narrow("battlesInRow", &raw.battles_in_row)?,
            is_win_in_row: raw.is_win_in_row,
            ally: raw.ally.unwrap_or_else(|| ZERO_ADDRESS.to_string()),
            tiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gold: &str, tiles: &str) -> String {
        format!(
            r#"{{
                "gold": {gold}, "gems": "250", "perHour": 8,
                "alliesCount": 0, "alliesEarned": 0,
                "claimTime": "1700000000n", "battleTime": 0, "battleId": 3,
                "battlesInRow": 0, "isWinInRow": false,
                "ally": "0x0000000000000000000000000000000000000000",
                "tiles": {tiles}
            }}"#
        )
    }

    #[test]
    fn test_normalize_number_and_text() {
        assert_eq!(normalize_uint("x", &RawUint::Number(42)).unwrap(), 42);
        assert_eq!(
            normalize_uint("x", &RawUint::Text("1700000000n".into())).unwrap(),
            1_700_000_000
        );
        assert_eq!(normalize_uint("x", &RawUint::Text(" 7 ".into())).unwrap(), 7);
        assert_eq!(normalize_uint("x", &RawUint::Float(12.0)).unwrap(), 12);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        for raw in [
            RawUint::Text("-5".into()),
            RawUint::Text("0x10".into()),
            RawUint::Text(String::new()),
            RawUint::Float(1.5),
            RawUint::Float(-1.0),
            RawUint::Float(f64::NAN),
        ] {
            assert!(
                matches!(normalize_uint("x", &raw), Err(SnapshotError::InvalidNumber { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unsafe_values_are_truncated_not_rejected() {
        // 2^53 + 1 is not representable as a double
        let value = normalize_uint("x", &RawUint::Text("9007199254740993".into())).unwrap();
        assert_eq!(value, 9_007_199_254_740_992);

        let huge = normalize_uint("x", &RawUint::Text("1".repeat(30))).unwrap();
        assert_eq!(huge, u64::MAX);
    }

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = KingdomSnapshot::from_json(&record("1000", "[1, 0, \"23\", null]")).unwrap();
        assert_eq!(snapshot.gold, 1000);
        assert_eq!(snapshot.gems, 250);
        assert_eq!(snapshot.claim_time, 1_700_000_000);
        assert_eq!(snapshot.battle_id, 3);
        assert_eq!(&snapshot.tiles[..4], &[1, 0, 23, 0]);
        assert!(snapshot.tiles[4..].iter().all(|&t| t == 0));
        assert!(snapshot.is_registered());
        assert!(!snapshot.has_ally());
    }

    #[test]
    fn test_field_overflow() {
        let err = KingdomSnapshot::from_json(&record("4294967296", "[]")).unwrap_err();
        match err {
            SnapshotError::FieldOverflow { field, value } => {
                assert_eq!(field, "gold");
                assert_eq!(value, 4_294_967_296);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tile_overflow_names_index() {
        let err = KingdomSnapshot::from_json(&record("0", "[0, 256]")).unwrap_err();
        assert!(err.to_string().starts_with("tiles[1]"));
    }

    #[test]
    fn test_missing_field_is_json_error() {
        let err = KingdomSnapshot::from_json(r#"{"gold": 1}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }

    #[test]
    fn test_default_is_unregistered() {
        let snapshot = KingdomSnapshot::default();
        assert!(!snapshot.is_registered());
        assert_eq!(snapshot.tiles.len(), TILE_COUNT);
    }
}
