//! Theory command implementation.

use super::output::{JsonTheory, format_theory, format_timestamp};
use super::{CliError, Context, OutputFormat, load_snapshot, print_json};
use kingdom::project;
use std::path::PathBuf;

/// Execute the theory command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded.
pub(crate) fn execute(
    ctx: &Context,
    snapshot: PathBuf,
    format: OutputFormat,
) -> Result<(), CliError> {
    let path = snapshot;
    let snapshot = load_snapshot(&path)?;
    let now = ctx.now();
    let theory = project(&snapshot, now);

    log::debug!(
        "projected {} at {now}: {} hour(s), +{}",
        path.display(),
        theory.hours_passed,
        theory.earned
    );

    match format {
        OutputFormat::Text => {
            println!("Kingdom: {}", path.display());
            println!("  As of:        {}", format_timestamp(now));
            println!();
            print!("{}", format_theory(&snapshot, &theory));
        }
        OutputFormat::Json => print_json(&JsonTheory::new(&snapshot, theory, now))?,
    }

    Ok(())
}
