//! Turn driver interface and the game loop.
//!
//! The core never talks to the game server directly. A [`TurnDriver`]
//! supplies one snapshot per turn and accepts the resulting [`ActionSet`];
//! [`run_game`] sequences the two with exactly one turn in flight.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{FlowError, FlowResult};
use crate::flow::FlowField;
use crate::grid::{GameMap, PlayerId};
use crate::policy::{ActionSet, MovePolicy, plan_moves};

/// Source of snapshots and sink for actions.
pub trait TurnDriver {
    /// Transport or decoding failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The acting player's id.
    fn player(&self) -> PlayerId;

    /// The next turn's snapshot, or `None` once the game is over.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the snapshot cannot be obtained.
    fn next_snapshot(&mut self) -> Result<Option<GameMap>, Self::Error>;

    /// Transmit this turn's actions.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the actions cannot be sent.
    fn submit(&mut self, actions: &ActionSet) -> Result<(), Self::Error>;
}

/// What to do when a turn's computation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    /// Stop the game loop and return the error.
    #[default]
    Abort,
    /// Submit an all-Still action set and keep playing.
    HoldStill,
}

/// Options for [`run_game`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Behaviour on a failed turn.
    pub fallback: FallbackMode,
    /// Log a warning when a turn takes longer than this.
    pub turn_budget: Option<Duration>,
}

/// Outcome of a single computed turn.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// Actions to submit.
    pub actions: ActionSet,
    /// Cells owned by the acting player.
    pub owned: usize,
    /// Actions that move.
    pub moving: usize,
    /// Owned cells without a direction toward the frontier.
    pub undirected: usize,
    /// Combined strength of the owned cells.
    pub strength: u64,
    /// The flow field the actions were planned from.
    pub field: FlowField,
    /// Wall time spent in the search and the policy.
    pub elapsed: Duration,
}

/// A player: its id plus a move policy.
#[derive(Debug, Clone)]
pub struct Bot<P> {
    player: PlayerId,
    policy: P,
}

impl<P: MovePolicy> Bot<P> {
    /// Create a bot playing as `player`.
    #[must_use]
    pub const fn new(player: PlayerId, policy: P) -> Self {
        Self { player, policy }
    }

    /// The player this bot acts for.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// The policy in use.
    #[must_use]
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// Compute the flow field and actions for one snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] if the policy produced an invalid action.
    pub fn play_turn(&self, map: &GameMap) -> FlowResult<TurnReport> {
        let start = Instant::now();
        let field = FlowField::compute(map, self.player);
        let actions = plan_moves(map, self.player, &field, &self.policy)?;
        let elapsed = start.elapsed();

        // Only owned cells ever carry a direction.
        let owned = actions.len();
        Ok(TurnReport {
            moving: actions.moving_count(),
            owned,
            undirected: owned.saturating_sub(field.directed_count()),
            strength: map.total_strength(self.player),
            elapsed,
            actions,
            field,
        })
    }
}

/// Totals for a finished game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameSummary {
    /// Turns played.
    pub turns: u32,
    /// Turns answered with the all-Still fallback.
    pub fallback_turns: u32,
    /// Turns that exceeded the budget.
    pub slow_turns: u32,
    /// Longest single turn.
    pub max_turn_time: Duration,
}

/// Failure of [`run_game`].
#[derive(Debug, Error)]
pub enum RunError {
    /// The driver could not deliver a snapshot or accept actions.
    #[error("turn driver failed: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// A turn's computation failed and the fallback mode was `Abort`.
    #[error("turn {turn} failed: {source}")]
    Turn {
        /// Zero-based turn index.
        turn: u32,
        /// Underlying error.
        #[source]
        source: FlowError,
    },
}

impl RunError {
    fn driver<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Driver(Box::new(err))
    }
}

/// Dimensions are fixed for a whole game.
fn check_dimensions(expected: (u16, u16), map: &GameMap) -> FlowResult<()> {
    if (map.width(), map.height()) == expected {
        Ok(())
    } else {
        Err(FlowError::MalformedSnapshot {
            width: expected.0,
            height: expected.1,
            cells: map.len(),
        })
    }
}

/// Play until the driver reports the end of the game.
///
/// Every snapshot must have the dimensions of the first one; a snapshot that
/// does not is a failed turn.
///
/// # Errors
///
/// Returns [`RunError::Driver`] on any driver failure, and
/// [`RunError::Turn`] on a failed turn when the fallback is `Abort`.
pub fn run_game<D, P>(
    driver: &mut D,
    bot: &Bot<P>,
    options: RunOptions,
) -> Result<GameSummary, RunError>
where
    D: TurnDriver,
    P: MovePolicy,
{
    let mut summary = GameSummary::default();
    let mut dimensions = None;
    tracing::info!(player = bot.player(), fallback = ?options.fallback, "game started");

    while let Some(map) = driver.next_snapshot().map_err(RunError::driver)? {
        let turn = summary.turns;
        let expected = *dimensions.get_or_insert((map.width(), map.height()));
        let outcome = check_dimensions(expected, &map).and_then(|()| bot.play_turn(&map));
        let actions = match outcome {
            Ok(report) => {
                tracing::debug!(
                    turn,
                    owned = report.owned,
                    moving = report.moving,
                    undirected = report.undirected,
                    elapsed = ?report.elapsed,
                    "turn planned"
                );
                summary.max_turn_time = summary.max_turn_time.max(report.elapsed);
                if let Some(budget) = options.turn_budget.filter(|b| report.elapsed > *b) {
                    summary.slow_turns += 1;
                    tracing::warn!(
                        turn,
                        elapsed = ?report.elapsed,
                        budget = ?budget,
                        "turn exceeded budget"
                    );
                }
                report.actions
            }
            Err(source) => match options.fallback {
                FallbackMode::Abort => return Err(RunError::Turn { turn, source }),
                FallbackMode::HoldStill => {
                    tracing::warn!(turn, error = %source, "turn failed, holding all cells still");
                    summary.fallback_turns += 1;
                    ActionSet::hold(&map, bot.player())
                }
            },
        };

        driver.submit(&actions).map_err(RunError::driver)?;
        summary.turns += 1;
    }

    tracing::info!(
        turns = summary.turns,
        fallback_turns = summary.fallback_turns,
        slow_turns = summary.slow_turns,
        "game finished"
    );
    Ok(summary)
}
