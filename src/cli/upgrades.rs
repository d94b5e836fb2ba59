//! Upgrades command implementation.

use super::output::group_thousands;
use super::{CliError, Context, OutputFormat, load_snapshot, print_json};
use kingdom::kingdom::{BuildingUpgradeInfo, parse_buildings_for_upgrade};
use kingdom::{ProjectedTheory, project};
use serde::Serialize;
use std::path::PathBuf;

/// Upgrade row with affordability against projected gold.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpgradeRow {
    #[serde(flatten)]
    building: BuildingUpgradeInfo,
    affordable: bool,
}

/// Execute the upgrades command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded.
pub(crate) fn execute(
    ctx: &Context,
    snapshot: PathBuf,
    format: OutputFormat,
) -> Result<(), CliError> {
    let snapshot = load_snapshot(&snapshot)?;
    let theory = project(&snapshot, ctx.now());
    let rows = upgrade_rows(
        parse_buildings_for_upgrade(&snapshot.tiles, &ctx.rules.buildings),
        &theory,
    );

    match format {
        OutputFormat::Text => print!("{}", format_rows(&rows, &theory)),
        OutputFormat::Json => print_json(&rows)?,
    }

    Ok(())
}

fn upgrade_rows(buildings: Vec<BuildingUpgradeInfo>, theory: &ProjectedTheory) -> Vec<UpgradeRow> {
    buildings
        .into_iter()
        .map(|building| UpgradeRow {
            affordable: building.can_upgrade()
                && u64::from(building.upgrade_cost) <= theory.gold_theory,
            building,
        })
        .collect()
}

fn format_rows(rows: &[UpgradeRow], theory: &ProjectedTheory) -> String {
    if rows.is_empty() {
        return "No buildings to upgrade.\n".to_string();
    }

    let mut output = format!(
        "Projected gold: {}\n\n",
        group_thousands(theory.gold_theory)
    );
    output.push_str("  Tile  Level  Upgrades  Left        Cost  +/hour  \n");
    output.push_str("  ----  -----  --------  ----  ----------  ------  \n");
    for row in rows {
        let b = &row.building;
        let status = if !b.can_upgrade() {
            "max"
        } else if row.affordable {
            "ok"
        } else {
            "short"
        };
        output.push_str(&format!(
            "  {:>4}  {:>5}  {:>8}  {:>4}  {:>10}  {:>6}  {status}\n",
            b.tile_id,
            b.level,
            b.upgrades,
            b.upgrades_left,
            group_thousands(u64::from(b.upgrade_cost)),
            b.upgrade_per_hour
        ));
    }

    let affordable = rows.iter().filter(|r| r.affordable).count();
    output.push_str(&format!("\n{affordable} of {} affordable now\n", rows.len()));
    output
}
