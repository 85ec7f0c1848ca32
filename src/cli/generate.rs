//! Generate command implementation.

use super::CliError;
use floodbot::mapgen::generate_snapshot;
use std::path::Path;

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if generation fails or the output cannot be written.
pub(crate) fn execute(
    width: u16,
    height: u16,
    players: usize,
    seed: Option<u64>,
    player: u8,
    output: Option<&Path>,
) -> Result<(), CliError> {
    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(42)
    });

    if player == 0 || usize::from(player) > players {
        return Err(CliError::new(format!(
            "Acting player {player} is not one of the {players} players"
        )));
    }

    let mut snapshot = generate_snapshot(seed, width, height, players)?;
    snapshot.player = player;
    tracing::info!(seed, width, height, players, "generated snapshot");

    match output {
        Some(path) => {
            snapshot.save(path)?;
            eprintln!("Snapshot written to: {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
