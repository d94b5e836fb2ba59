//! Plan command implementation.
//!
//! Runs the client-side guards for one contract write and prints the
//! validated call for the submission layer. Nothing is sent.

use super::{CliError, Context, load_snapshot, print_json};
use clap::Subcommand;
use kingdom::kingdom::{
    authorize_battle, authorize_build, authorize_sell, authorize_swap, authorize_upgrade,
    format_bnb, gems_to_gold, gems_to_wei, quote_build, reward_preview, wei_to_usd,
};
use kingdom::{ContractCall, KingdomSnapshot, TileBoard, TileId, TileSelection, WinChance, project};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Contract writes that can be planned.
#[derive(Subcommand, Debug)]
pub(crate) enum PlanAction {
    /// placeBuildings: build on a batch of free tiles
    Build {
        /// Snapshot file (getKingdom result as JSON)
        snapshot: PathBuf,

        /// Building level (1-8)
        #[arg(short, long)]
        level: u8,

        /// Tile ids, comma separated
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        tiles: Vec<i64>,

        /// Also select this many next free tiles
        #[arg(long, default_value = "0")]
        next_free: usize,
    },

    /// upgradeBuilding: upgrade one building
    Upgrade {
        /// Snapshot file (getKingdom result as JSON)
        snapshot: PathBuf,

        /// Tile id of the building
        #[arg(short, long)]
        tile: TileId,
    },

    /// sellGems: sell gems for BNB
    Sell {
        /// Snapshot file (getKingdom result as JSON)
        snapshot: PathBuf,

        /// Gems to sell
        #[arg(short, long)]
        gems: u64,

        /// BNB price in USD for the preview
        #[arg(long)]
        bnb_usd: Option<f64>,
    },

    /// swapGemsToGold: swap gems for gold
    Swap {
        /// Snapshot file (getKingdom result as JSON)
        snapshot: PathBuf,

        /// Gems to swap
        #[arg(short, long)]
        gems: u64,
    },

    /// battle: start a battle
    Battle {
        /// Snapshot file (getKingdom result as JSON)
        snapshot: PathBuf,

        /// Win chance (40-60)
        #[arg(short, long, default_value = "50", allow_negative_numbers = true)]
        win_chance: i64,
    },
}

/// Validated call with its target and a preview of the outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlannedCall<'a> {
    contract: &'a str,
    chain_id: u64,
    #[serde(flatten)]
    call: ContractCall,
    preview: Value,
}

/// Execute the plan command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, an input is invalid, or
/// a guard rejects the write.
pub(crate) fn execute(ctx: &Context, action: PlanAction) -> Result<(), CliError> {
    let now = ctx.now();
    let (call, preview) = match action {
        PlanAction::Build {
            snapshot,
            level,
            tiles,
            next_free,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let selection = select_tiles(&snapshot, &tiles, next_free)?;
            let call = authorize_build(&snapshot, &selection, level, &ctx.rules, now)?;
            let quote = quote_build(level, selection.len(), &ctx.rules);
            (call, json!({ "quote": quote, "theory": project(&snapshot, now) }))
        }

        PlanAction::Upgrade { snapshot, tile } => {
            let snapshot = load_snapshot(&snapshot)?;
            let call = authorize_upgrade(&snapshot, tile, &ctx.rules, now)?;
            let building = TileBoard::parse(&snapshot.tiles).get(tile).copied();
            let stats = building.and_then(|b| ctx.rules.stats(b.level));
            (
                call,
                json!({
                    "building": building,
                    "upgradeCost": stats.map(|s| s.upgrade_cost()),
                    "upgradePerHour": stats.map(|s| s.upgrade_per_hour()),
                    "theory": project(&snapshot, now),
                }),
            )
        }

        PlanAction::Sell {
            snapshot,
            gems,
            bnb_usd,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let call = authorize_sell(&snapshot, gems, now)?;
            let wei = gems_to_wei(gems, ctx.rules.gems_per_bnb);
            (
                call,
                json!({
                    "wei": wei.to_string(),
                    "bnb": format_bnb(wei),
                    "usd": bnb_usd.map(|price| wei_to_usd(wei, price)),
                }),
            )
        }

        PlanAction::Swap { snapshot, gems } => {
            let snapshot = load_snapshot(&snapshot)?;
            let call = authorize_swap(&snapshot, gems, now)?;
            (
                call,
                json!({ "gold": gems_to_gold(gems, ctx.rules.gems_to_gold_rate) }),
            )
        }

        PlanAction::Battle {
            snapshot,
            win_chance,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let win_chance = WinChance::new(win_chance)?;
            let call = authorize_battle(&snapshot, win_chance, &ctx.rules, now)?;
            (
                call,
                json!({
                    "reward": reward_preview(&snapshot, win_chance),
                    "risk": win_chance.risk().to_string(),
                }),
            )
        }
    };

    log::info!("planned {}", call.function_name());

    print_json(&PlannedCall {
        contract: &ctx.rules.contract_address,
        chain_id: ctx.rules.chain_id,
        call,
        preview,
    })
}

/// Build the pending selection from explicit ids, then fill with free tiles.
fn select_tiles(
    snapshot: &KingdomSnapshot,
    tiles: &[i64],
    next_free: usize,
) -> Result<TileSelection, CliError> {
    let board = TileBoard::parse(&snapshot.tiles);
    let mut selection = TileSelection::new();
    for &tile in tiles {
        selection.add(tile, &board)?;
    }
    for _ in 0..next_free {
        selection
            .add_next_free(&board)
            .ok_or_else(|| CliError::new("no free tiles left to select"))?;
    }
    Ok(selection)
}
