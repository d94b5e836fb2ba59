#![no_main]

use arbitrary::Arbitrary;
use kingdom::kingdom::{TILE_COUNT, find_next_free, parse_buildings_for_upgrade, validate_tile_selection};
use kingdom::{Rules, TileBoard, TileSelection};
use libfuzzer_sys::fuzz_target;

/// Structured input for board fuzzing.
#[derive(Arbitrary, Debug)]
struct TilesInput {
    /// Packed tile bytes, any length.
    tiles: Vec<u8>,
    /// Tile ids to try adding to a selection.
    picks: Vec<i64>,
    /// Number of next-free fills after the picks.
    fills: u8,
}

fuzz_target!(|input: TilesInput| {
    let board = TileBoard::parse(&input.tiles);
    assert_eq!(board.occupied_count() + board.free_count(), TILE_COUNT);

    let rules = Rules::default();
    for row in parse_buildings_for_upgrade(&input.tiles, &rules.buildings) {
        assert!(board.is_occupied(row.tile_id));
    }

    let mut selection = TileSelection::new();
    for &pick in input.picks.iter().take(64) {
        let expected = validate_tile_selection(pick, board.occupied_index(), selection.tiles());
        assert_eq!(selection.add(pick, &board), expected);
    }
    for _ in 0..input.fills.min(64) {
        if selection.add_next_free(&board).is_none() {
            assert!(find_next_free(board.occupied_index(), 0)
                .is_none_or(|id| selection.tiles().contains(&id)));
            break;
        }
    }

    // Selection never holds an occupied or duplicate tile
    let tiles = selection.tiles();
    for (i, id) in tiles.iter().enumerate() {
        assert!(!board.is_occupied(*id));
        assert!(!tiles[i + 1..].contains(id));
    }
});
