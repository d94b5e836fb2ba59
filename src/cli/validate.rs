//! Snapshot validation command implementation.

use super::CliError;
use super::output::group_thousands;
use kingdom::kingdom::{MAX_TILE_ID, RawKingdom, TILE_COUNT, decode_tile};
use kingdom::{KingdomSnapshot, TileBoard, TileId};
use std::fs;
use std::path::PathBuf;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a kingdom record, or
/// carries a field that does not fit its contract width.
pub(crate) fn execute(snapshot: PathBuf) -> Result<(), CliError> {
    let json = fs::read_to_string(&snapshot)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", snapshot.display())))?;

    println!("Validating: {}", snapshot.display());
    println!();

    let raw = match RawKingdom::from_json(&json) {
        Ok(raw) => {
            print_check("Kingdom record", true);
            raw
        }
        Err(e) => {
            print_check("Kingdom record", false);
            return Err(CliError::new(format!("Not a kingdom record: {e}")));
        }
    };

    let entries = raw.tiles.len();
    if entries == TILE_COUNT {
        print_check(&format!("Tile array ({TILE_COUNT} entries)"), true);
    } else {
        println!("  ! Tile array: {entries} entries, expected {TILE_COUNT} (missing read as empty)");
    }

    let snapshot = match KingdomSnapshot::try_from(raw) {
        Ok(snapshot) => {
            print_check("Field normalization", true);
            snapshot
        }
        Err(e) => {
            print_check("Field normalization", false);
            return Err(CliError::new(format!("Normalization failed: {e}")));
        }
    };

    let invalid: Vec<TileId> = (0..=MAX_TILE_ID)
        .filter(|&id| {
            decode_tile(id, snapshot.tiles[usize::from(id)])
                .is_some_and(|info| !info.is_domain_valid())
        })
        .collect();
    print_check("Tile values in contract domain", invalid.is_empty());
    if !invalid.is_empty() {
        println!("    out-of-domain tiles: {invalid:?}");
    }

    let board = TileBoard::parse(&snapshot.tiles);

    println!();
    println!("Summary:");
    println!(
        "  Registered:   {}",
        if snapshot.is_registered() { "yes" } else { "no" }
    );
    println!("  Gold:         {}", group_thousands(u64::from(snapshot.gold)));
    println!("  Gems:         {}", group_thousands(u64::from(snapshot.gems)));
    println!("  Per hour:     {}", group_thousands(u64::from(snapshot.per_hour)));
    println!(
        "  Tiles:        {} occupied, {} free",
        board.occupied_count(),
        board.free_count()
    );
    if snapshot.has_ally() {
        println!("  Ally:         {}", snapshot.ally);
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
