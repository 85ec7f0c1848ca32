//! Plan command implementation.

use super::output::{JsonPlan, format_summary};
use super::{CliError, OutputFormat};
use floodbot::render::{render_actions, render_flow};
use floodbot::{Bot, PolicyConfig, Snapshot, ThresholdPolicy};
use std::path::Path;

/// Execute the plan command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the turn fails.
pub(crate) fn execute(
    snapshot: &Path,
    format: OutputFormat,
    threshold: Option<u16>,
) -> Result<(), CliError> {
    let (snapshot, map) = Snapshot::load(snapshot)?;
    let player = snapshot.player;

    let mut config = PolicyConfig::default();
    if let Some(multiplier) = threshold {
        config.strength_multiplier = multiplier;
    }
    let bot = Bot::new(player, ThresholdPolicy::new(config));
    let report = bot.play_turn(&map)?;

    match format {
        OutputFormat::Text => {
            println!("{}", render_flow(&map, player, &report.field));
            println!("{}", render_actions(&map, player, &report.actions));
            print!("{}", format_summary(&report));
        }
        OutputFormat::Json => {
            let plan = JsonPlan::from_report(&map, player, &report);
            let json = serde_json::to_string_pretty(&plan)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
