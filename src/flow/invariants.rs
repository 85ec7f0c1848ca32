//! Flow field invariants - sanity checks that detect bugs.
//!
//! A correct search never trips these. They back the property tests and
//! the fuzz targets.

use crate::flow::FlowField;
use crate::grid::{Direction, GameMap, PlayerId};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check every flow field invariant for `player` on `map`.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_field(map: &GameMap, player: PlayerId, field: &FlowField) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let has_frontier = map.cells().iter().any(|cell| !cell.is_owned_by(player));

    for (coord, cell) in map.iter() {
        let distance = field.distance(coord);
        let direction = field.direction(coord);

        if !cell.is_owned_by(player) {
            if distance != Some(0) || direction.is_some() {
                violations.push(InvariantViolation {
                    message: format!(
                        "Frontier cell {coord} has distance {distance:?} and \
                         direction {direction:?}"
                    ),
                });
            }
            continue;
        }

        if !has_frontier {
            if distance.is_some() || direction.is_some() {
                violations.push(InvariantViolation {
                    message: format!("Cell {coord} is directed on a map with no frontier"),
                });
            }
            continue;
        }

        // On a torus every cell reaches every other, so owned cells must be directed.
        let (Some(d), Some(dir)) = (distance, direction) else {
            violations.push(InvariantViolation {
                message: format!("Owned cell {coord} was never reached"),
            });
            continue;
        };

        if d == 0 || dir == Direction::Still {
            violations.push(InvariantViolation {
                message: format!("Owned cell {coord} has distance {d} and direction {dir}"),
            });
            continue;
        }

        let next = map.neighbor(coord, dir);
        if field.distance(next) != Some(d - 1) {
            violations.push(InvariantViolation {
                message: format!(
                    "Cell {coord} at distance {d} points {dir} to {next} at distance {:?}",
                    field.distance(next)
                ),
            });
        }

        let closest = Direction::CARDINALS
            .iter()
            .filter_map(|&nd| field.distance(map.neighbor(coord, nd)))
            .min();
        if closest != Some(d - 1) {
            violations.push(InvariantViolation {
                message: format!(
                    "Cell {coord} at distance {d} has nearest neighbor at {closest:?}"
                ),
            });
        }
    }

    violations
}
