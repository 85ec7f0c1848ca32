//! Frontier flow field.
//!
//! A multi-source breadth-first search seeded with every cell the acting
//! player does not own. Each newly reached cell records the direction back
//! toward the cell that reached it, so an owned cell read at the end holds
//! the first step of a shortest path to non-owned territory.
//!
//! Expansion is strictly level-order through a FIFO queue and the first
//! arrival at a cell is final. Ties are broken by source scan order, then by
//! [`Direction::CARDINALS`] order at each dequeue.

mod invariants;

pub use invariants::{InvariantViolation, check_field};

use std::collections::VecDeque;

use crate::grid::{Coord, Direction, GameMap, PlayerId};

/// Per-turn result of the frontier search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowField {
    /// Map width, for index math.
    width: u16,
    /// Direction toward the frontier, row-major. `None` for sources and
    /// unreachable cells.
    directions: Vec<Option<Direction>>,
    /// Steps to the nearest non-owned cell, row-major. `None` if unreachable.
    distances: Vec<Option<u32>>,
}

impl FlowField {
    /// Run the frontier search for `player` over `map`.
    #[must_use]
    pub fn compute(map: &GameMap, player: PlayerId) -> Self {
        let size = map.len();
        let mut visited = vec![false; size];
        let mut directions = vec![None; size];
        let mut distances = vec![None; size];
        let mut queue = VecDeque::with_capacity(size);

        for (idx, cell) in map.cells().iter().enumerate() {
            if !cell.is_owned_by(player) {
                visited[idx] = true;
                distances[idx] = Some(0);
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            let here = map.coord_at(idx);
            let next_distance = distances[idx].map_or(0, |d: u32| d + 1);

            for direction in Direction::CARDINALS {
                let target = map.neighbor(here, direction);
                let Some(t) = map.index_of(target) else {
                    continue;
                };
                if visited[t] {
                    continue;
                }
                visited[t] = true;
                directions[t] = Some(direction.opposite());
                distances[t] = Some(next_distance);
                queue.push_back(t);
            }
        }

        Self {
            width: map.width(),
            directions,
            distances,
        }
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        let width = usize::from(self.width);
        let idx = usize::from(coord.y) * width + usize::from(coord.x);
        (usize::from(coord.x) < width && idx < self.directions.len()).then_some(idx)
    }

    /// Direction toward the nearest non-owned cell.
    ///
    /// `None` for non-owned cells, for cells with no non-owned cell anywhere
    /// on the map, and for out-of-range coordinates.
    #[must_use]
    pub fn direction(&self, coord: Coord) -> Option<Direction> {
        self.index(coord).and_then(|idx| self.directions[idx])
    }

    /// Number of steps to the nearest non-owned cell.
    #[must_use]
    pub fn distance(&self, coord: Coord) -> Option<u32> {
        self.index(coord).and_then(|idx| self.distances[idx])
    }

    /// Whether this cell seeded the search (not owned by the acting player).
    #[must_use]
    pub fn is_source(&self, coord: Coord) -> bool {
        self.distance(coord) == Some(0)
    }

    /// True when the search had no sources at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.iter().all(Option::is_none)
    }

    /// Number of cells holding a direction.
    #[must_use]
    pub fn directed_count(&self) -> usize {
        self.directions.iter().filter(|d| d.is_some()).count()
    }

    /// Take one step along the field, or `None` if `coord` has no direction.
    #[must_use]
    pub fn step_from(&self, map: &GameMap, coord: Coord) -> Option<Coord> {
        self.direction(coord).map(|d| map.neighbor(coord, d))
    }

    /// Follow the field from `coord` until a source is reached.
    ///
    /// The returned path starts with `coord` and ends on a non-owned cell.
    /// Returns `None` when `coord` cannot reach the frontier.
    #[must_use]
    pub fn path_to_frontier(&self, map: &GameMap, coord: Coord) -> Option<Vec<Coord>> {
        let steps = self.distance(coord)?;
        let mut path = Vec::with_capacity(steps as usize + 1);
        let mut current = coord;
        path.push(current);
        while !self.is_source(current) {
            current = self.step_from(map, current)?;
            path.push(current);
            // A well-formed field never needs more than `steps` moves.
            if path.len() > steps as usize + 1 {
                return None;
            }
        }
        Some(path)
    }
}
