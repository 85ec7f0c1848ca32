//! Output formatting utilities for CLI.

use floodbot::turn::TurnReport;
use floodbot::{Action, GameMap, PlayerId};
use serde::Serialize;

/// JSON-serializable plan for one snapshot.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlan {
    /// Acting player.
    pub(super) player: PlayerId,
    /// Map width.
    pub(super) width: u16,
    /// Map height.
    pub(super) height: u16,
    /// Cells owned by the player.
    pub(super) owned: usize,
    /// Cells that move this turn.
    pub(super) moving: usize,
    /// Owned cells with no path to the frontier.
    pub(super) undirected: usize,
    /// Combined strength of the owned cells.
    pub(super) strength: u64,
    /// Per-cell moves.
    pub(super) actions: Vec<Action>,
}

impl JsonPlan {
    /// Create from a turn report.
    pub(super) fn from_report(map: &GameMap, player: PlayerId, report: &TurnReport) -> Self {
        Self {
            player,
            width: map.width(),
            height: map.height(),
            owned: report.owned,
            moving: report.moving,
            undirected: report.undirected,
            strength: report.strength,
            actions: report.actions.as_slice().to_vec(),
        }
    }
}

/// Format a turn report summary as human-readable text.
pub(super) fn format_summary(report: &TurnReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Owned cells: {}\n", report.owned));
    output.push_str(&format!("  Strength: {}\n", report.strength));
    output.push_str(&format!("  Moving: {}\n", report.moving));
    output.push_str(&format!("  Still:  {}\n", report.owned - report.moving));
    if report.undirected > 0 {
        output.push_str(&format!("  No path to frontier: {}\n", report.undirected));
    }
    output.push_str(&format!("Computed in {} us\n", report.elapsed.as_micros()));
    output
}
