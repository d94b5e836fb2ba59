//! Tiles command implementation.

use super::output::format_ranges;
use super::{CliError, OutputFormat, load_snapshot, print_json};
use kingdom::kingdom::{TILE_COUNT, TileInfo};
use kingdom::{TileBoard, TileId};
use serde::Serialize;
use std::path::PathBuf;

/// JSON view of the decoded board.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBoard<'a> {
    occupied_count: usize,
    free_count: usize,
    occupied: &'a [TileInfo],
    #[serde(skip_serializing_if = "Option::is_none")]
    free: Option<&'a [TileId]>,
}

/// Execute the tiles command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded.
pub(crate) fn execute(snapshot: PathBuf, free: bool, format: OutputFormat) -> Result<(), CliError> {
    let snapshot = load_snapshot(&snapshot)?;
    let board = TileBoard::parse(&snapshot.tiles);

    match format {
        OutputFormat::Text => print!("{}", format_board(&board, free)),
        OutputFormat::Json => print_json(&JsonBoard {
            occupied_count: board.occupied_count(),
            free_count: board.free_count(),
            occupied: board.occupied(),
            free: free.then(|| board.free()),
        })?,
    }

    Ok(())
}

fn format_board(board: &TileBoard, free: bool) -> String {
    let mut output = format!(
        "Tiles: {} occupied, {} free of {TILE_COUNT}\n",
        board.occupied_count(),
        board.free_count()
    );

    if !board.occupied().is_empty() {
        output.push('\n');
        output.push_str("  Tile  Level  Upgrades   Raw\n");
        output.push_str("  ----  -----  --------  ----\n");
        for info in board.occupied() {
            let flag = if info.is_domain_valid() { "" } else { "  (out of domain)" };
            output.push_str(&format!(
                "  {:>4}  {:>5}  {:>8}  {:>4}{flag}\n",
                info.tile_id, info.level, info.upgrades, info.raw
            ));
        }
    }

    if free {
        output.push('\n');
        output.push_str(&format!("  Free: {}\n", format_ranges(board.free())));
    }

    output
}
