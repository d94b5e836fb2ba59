//! Integration tests that load snapshot and rules files from disk.
//!
//! Run with: cargo test snapshot_files

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use kingdom::kingdom::{
    authorize_build, authorize_sell, authorize_upgrade, parse_buildings_for_upgrade,
};
use kingdom::{
    ContractCall, KingdomSnapshot, LiveTheory, Rejection, Rules, SnapshotError, TileBoard,
    TileSelection, project,
};

/// Claim time on an hour boundary.
const CLAIM: u64 = 1_699_999_200;

fn kingdom_json(gold: serde_json::Value, tiles: &serde_json::Value) -> String {
    json!({
        "gold": gold,
        "gems": "1500",
        "perHour": 24,
        "alliesCount": 0,
        "alliesEarned": "0",
        "claimTime": CLAIM,
        "battleTime": 0,
        "battleId": 0,
        "battlesInRow": 0,
        "isWinInRow": false,
        "ally": "0x0000000000000000000000000000000000000000",
        "tiles": tiles,
    })
    .to_string()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn board_json(entries: &[(usize, u8)]) -> serde_json::Value {
    let mut tiles = vec![json!(0); 360];
    for &(idx, raw) in entries {
        tiles[idx] = json!(raw);
    }
    json!(tiles)
}

#[test]
fn test_load_and_project() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "kingdom.json",
        &kingdom_json(json!("20000n"), &board_json(&[(0, 2), (1, 13)])),
    );

    let snapshot = KingdomSnapshot::load(&path).unwrap();
    assert_eq!(snapshot.gold, 20_000);
    assert_eq!(snapshot.gems, 1_500);
    assert!(snapshot.is_registered());
    assert!(!snapshot.has_ally());

    let theory = project(&snapshot, CLAIM + 2 * 3_600 + 59);
    assert_eq!(theory.hours_passed, 2);
    assert_eq!(theory.gold_theory, 20_048);
    assert_eq!(theory.gems_theory, 1_548);

    let board = TileBoard::parse(&snapshot.tiles);
    assert_eq!(board.occupied_count(), 2);
    assert_eq!(board.get(1).map(|t| (t.level, t.upgrades)), Some((3, 1)));
}

#[test]
fn test_short_and_null_tiles() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "short.json",
        &kingdom_json(json!(0), &json!([1, null, "2"])),
    );

    let snapshot = KingdomSnapshot::load(&path).unwrap();
    assert_eq!(&snapshot.tiles[..4], &[1, 0, 2, 0]);
    assert_eq!(TileBoard::parse(&snapshot.tiles).free_count(), 358);
}

#[test]
fn test_rejects_overflow_and_garbage() {
    let dir = TempDir::new().unwrap();

    let too_big = write(
        &dir,
        "big.json",
        &kingdom_json(json!("4294967296"), &board_json(&[])),
    );
    assert!(matches!(
        KingdomSnapshot::load(&too_big),
        Err(SnapshotError::FieldOverflow { ref field, value: 4_294_967_296 }) if field == "gold"
    ));

    let negative = write(&dir, "neg.json", &kingdom_json(json!(-5), &board_json(&[])));
    assert!(matches!(
        KingdomSnapshot::load(&negative),
        Err(SnapshotError::InvalidNumber { .. })
    ));

    let not_json = write(&dir, "bad.json", "{ not json");
    assert!(matches!(
        KingdomSnapshot::load(&not_json),
        Err(SnapshotError::Json(_))
    ));

    assert!(matches!(
        KingdomSnapshot::load(&dir.path().join("missing.json")),
        Err(SnapshotError::Io(_))
    ));
}

#[test]
fn test_guards_against_loaded_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "kingdom.json",
        &kingdom_json(json!(25_000), &board_json(&[(0, 1), (2, 91)])),
    );
    let snapshot = KingdomSnapshot::load(&path).unwrap();
    let rules = Rules::default();
    let now = CLAIM + 60;
    let board = TileBoard::parse(&snapshot.tiles);

    let mut selection = TileSelection::new();
    assert_eq!(selection.add(0, &board).unwrap_err().to_string(), "tile 0 is already occupied");
    assert_eq!(selection.add_next_free(&board), Some(1));
    assert_eq!(selection.add_next_free(&board), Some(3));

    assert_eq!(
        authorize_build(&snapshot, &selection, 1, &rules, now),
        Ok(ContractCall::PlaceBuildings {
            tile_ids: vec![1, 3],
            level: 1
        })
    );
    assert_eq!(
        authorize_upgrade(&snapshot, 2, &rules, now),
        Err(Rejection::MaxUpgrades(2))
    );
    assert!(authorize_sell(&snapshot, 1_501, now).is_err());

    let rows = parse_buildings_for_upgrade(&snapshot.tiles, &rules.buildings);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].upgrade_cost, 2_500);
}

#[test]
fn test_rules_override_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "rules.json",
        r#"{"gemsToGoldRate": 3, "buildings": {"1": {"cost": 400, "perHour": 4}}}"#,
    );

    let rules = Rules::load(&path).unwrap();
    assert_eq!(rules.gems_to_gold_rate, 3);
    assert_eq!(rules.stats(1).map(|s| s.cost), Some(400));
    assert!(rules.stats(2).is_none());
    assert_eq!(rules.battle_cooldown, Rules::default().battle_cooldown);
}

#[test]
fn test_live_theory_follows_new_reads() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "kingdom.json", &kingdom_json(json!(100), &board_json(&[])));

    let mut live = LiveTheory::new(KingdomSnapshot::load(&path).unwrap(), CLAIM + 3_600);
    assert_eq!(live.theory().gold_theory, 124);
    let handle = live.snapshot_handle();

    fs::write(&path, kingdom_json(json!(5), &board_json(&[]))).unwrap();
    let theory = live.observe(KingdomSnapshot::load(&path).unwrap(), CLAIM + 3_600);

    assert_eq!(theory.gold_theory, 29);
    assert_eq!(live.generation(), 1);
    assert!(!live.is_current(0));
    assert_eq!(handle.gold, 100);
}
