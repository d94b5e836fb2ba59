#![no_main]

use kingdom::KingdomSnapshot;
use kingdom::kingdom::{RawKingdom, TILE_COUNT};
use libfuzzer_sys::fuzz_target;

// Arbitrary text through the full normalization path must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(raw) = RawKingdom::from_json(text) {
        let entries = raw.tiles.len();
        if let Ok(snapshot) = KingdomSnapshot::try_from(raw) {
            assert_eq!(snapshot.tiles.len(), TILE_COUNT);
            assert!(entries > 0 || snapshot.tiles.iter().all(|&t| t == 0));
        }
    }
});
