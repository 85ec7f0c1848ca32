//! Play command implementation.

use super::{CliError, FallbackArg};
use floodbot::protocol::StdioDriver;
use floodbot::{Bot, BotConfig, ThresholdPolicy, TurnDriver, run_game};
use std::io;
use std::path::Path;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the handshake fails, or
/// the game loop stops on an error.
pub(crate) fn execute(
    config: Option<&Path>,
    threshold: Option<u16>,
    fallback: Option<FallbackArg>,
) -> Result<(), CliError> {
    let mut bot_config = match config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    if let Some(multiplier) = threshold {
        bot_config.policy.strength_multiplier = multiplier;
    }
    if let Some(mode) = fallback {
        bot_config.fallback = mode.into();
    }

    let stdin = io::stdin().lock();
    let mut driver = StdioDriver::connect(stdin, io::stdout().lock(), &bot_config.name)?;
    let bot = Bot::new(driver.player(), ThresholdPolicy::new(bot_config.policy));
    let policy = bot.policy().config();
    tracing::info!(
        name = %bot_config.name,
        multiplier = policy.strength_multiplier,
        cap = policy.strength_cap,
        "threshold policy ready"
    );

    let summary = run_game(&mut driver, &bot, bot_config.run_options())?;
    tracing::info!(
        turns = summary.turns,
        max_turn_time = ?summary.max_turn_time,
        "session closed"
    );

    Ok(())
}
