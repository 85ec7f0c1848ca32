//! Move policy: turn a flow field into one action per owned cell.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};
use crate::flow::FlowField;
use crate::grid::{Cell, Coord, Direction, GameMap, PlayerId, STRENGTH_CAP};

/// One cell's chosen move for the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Cell being moved. Must be owned by the acting player.
    pub coord: Coord,
    /// Where it goes.
    pub direction: Direction,
}

impl Action {
    /// Create a new action.
    #[must_use]
    pub const fn new(coord: Coord, direction: Direction) -> Self {
        Self { coord, direction }
    }
}

/// The full output of a turn: at most one action per owned position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet {
    /// Actions in insertion order.
    actions: Vec<Action>,
    /// Position of each action in `actions`.
    index: HashMap<Coord, usize>,
}

impl ActionSet {
    /// Create an empty action set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An all-Still action for every cell `player` owns.
    #[must_use]
    pub fn hold(map: &GameMap, player: PlayerId) -> Self {
        let actions: Vec<Action> = map
            .owned_by(player)
            .map(|(coord, _)| Action::new(coord, Direction::Still))
            .collect();
        let index = actions
            .iter()
            .enumerate()
            .map(|(slot, a)| (a.coord, slot))
            .collect();
        Self { actions, index }
    }

    /// Add an action after validating it against the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidAction`] if `player` does not own the
    /// position, or [`FlowError::DuplicateAction`] if it already has an action.
    pub fn insert(&mut self, map: &GameMap, player: PlayerId, action: Action) -> FlowResult<()> {
        ensure_owned(map, player, action.coord)?;
        if self.index.contains_key(&action.coord) {
            return Err(FlowError::DuplicateAction {
                x: action.coord.x,
                y: action.coord.y,
            });
        }
        self.index.insert(action.coord, self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the set holds no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over actions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// The action for a position, if any.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Action> {
        self.index.get(&coord).map(|&slot| self.actions[slot])
    }

    /// Number of actions that are not [`Direction::Still`].
    #[must_use]
    pub fn moving_count(&self) -> usize {
        self.actions.iter().filter(|a| a.direction.is_cardinal()).count()
    }

    /// Borrow the actions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }
}

impl<'a> IntoIterator for &'a ActionSet {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// A strategy for a single owned cell.
///
/// Given the cell and the flow field's direction toward the frontier
/// (`None` when the field is undefined there), pick a move.
pub trait MovePolicy {
    /// Choose the move for one owned cell.
    fn decide(&self, cell: &Cell, toward_frontier: Option<Direction>) -> Direction;
}

impl<P: MovePolicy + ?Sized> MovePolicy for &P {
    fn decide(&self, cell: &Cell, toward_frontier: Option<Direction>) -> Direction {
        (**self).decide(cell, toward_frontier)
    }
}

/// Tunables for [`ThresholdPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// A cell moves once its strength exceeds this many turns of production.
    pub strength_multiplier: u16,
    /// A cell at this strength always moves.
    pub strength_cap: u8,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            strength_multiplier: 5,
            strength_cap: STRENGTH_CAP,
        }
    }
}

/// Hold still while accumulating, then advance along the flow field.
///
/// A cell moves when `strength > multiplier * production` (strictly) or when
/// it sits at the strength cap. Otherwise it stays still.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThresholdPolicy {
    config: PolicyConfig,
}

impl ThresholdPolicy {
    /// Create a policy with the given tunables.
    #[must_use]
    pub const fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// The tunables in use.
    #[must_use]
    pub const fn config(&self) -> PolicyConfig {
        self.config
    }

    /// Whether a cell has accumulated enough to move.
    #[must_use]
    pub fn should_move(&self, cell: &Cell) -> bool {
        let threshold = u32::from(self.config.strength_multiplier) * u32::from(cell.production);
        u32::from(cell.strength) > threshold || cell.strength == self.config.strength_cap
    }
}

impl MovePolicy for ThresholdPolicy {
    fn decide(&self, cell: &Cell, toward_frontier: Option<Direction>) -> Direction {
        if self.should_move(cell) {
            toward_frontier.unwrap_or(Direction::Still)
        } else {
            Direction::Still
        }
    }
}

fn ensure_owned(map: &GameMap, player: PlayerId, coord: Coord) -> FlowResult<&Cell> {
    match map.get(coord) {
        Some(cell) if cell.is_owned_by(player) => Ok(cell),
        _ => Err(FlowError::InvalidAction {
            x: coord.x,
            y: coord.y,
        }),
    }
}

/// Decide the action for a single position.
///
/// # Errors
///
/// Returns [`FlowError::InvalidAction`] if `player` does not own `coord`.
pub fn plan_action<P: MovePolicy + ?Sized>(
    map: &GameMap,
    player: PlayerId,
    field: &FlowField,
    policy: &P,
    coord: Coord,
) -> FlowResult<Action> {
    let cell = ensure_owned(map, player, coord)?;
    Ok(Action::new(coord, policy.decide(cell, field.direction(coord))))
}

/// Decide one action for every cell `player` owns, in scan order.
///
/// # Errors
///
/// Propagates [`FlowError`] from [`plan_action`] and [`ActionSet::insert`].
pub fn plan_moves<P: MovePolicy + ?Sized>(
    map: &GameMap,
    player: PlayerId,
    field: &FlowField,
    policy: &P,
) -> FlowResult<ActionSet> {
    let mut actions = ActionSet::new();
    for (coord, _) in map.owned_by(player) {
        let action = plan_action(map, player, field, policy, coord)?;
        actions.insert(map, player, action)?;
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 map where player 1 owns only the center.
    fn center_map(strength: u8, production: u8) -> GameMap {
        let mut cells = vec![Cell::unowned(0, 1); 9];
        cells[4] = Cell::owned(1, strength, production);
        GameMap::new(3, 3, cells).unwrap()
    }

    #[test]
    fn test_center_cell_moves_north() {
        let map = center_map(200, 10);
        let field = FlowField::compute(&map, 1);
        let actions = plan_moves(&map, 1, &field, &ThresholdPolicy::default()).unwrap();
        assert_eq!(actions.as_slice(), &[Action::new(Coord::new(1, 1), Direction::North)]);
    }

    #[test]
    fn test_center_cell_below_threshold_holds() {
        let map = center_map(40, 10);
        let field = FlowField::compute(&map, 1);
        let actions = plan_moves(&map, 1, &field, &ThresholdPolicy::default()).unwrap();
        assert_eq!(actions.as_slice(), &[Action::new(Coord::new(1, 1), Direction::Still)]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let policy = ThresholdPolicy::default();
        assert!(!policy.should_move(&Cell::owned(1, 50, 10)));
        assert!(policy.should_move(&Cell::owned(1, 51, 10)));
        assert!(policy.should_move(&Cell::owned(1, 255, 60)));
        assert!(!policy.should_move(&Cell::owned(1, 254, 60)));
        assert_eq!(policy.decide(&Cell::owned(1, 50, 10), Some(Direction::East)), Direction::Still);
        assert_eq!(policy.decide(&Cell::owned(1, 51, 10), Some(Direction::East)), Direction::East);
    }

    #[test]
    fn test_undefined_direction_holds() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.decide(&Cell::owned(1, 255, 0), None), Direction::Still);
    }

    #[test]
    fn test_custom_config() {
        let policy = ThresholdPolicy::new(PolicyConfig {
            strength_multiplier: 2,
            strength_cap: 200,
        });
        assert!(policy.should_move(&Cell::owned(1, 21, 10)));
        assert!(policy.should_move(&Cell::owned(1, 200, 150)));
        assert!(!policy.should_move(&Cell::owned(1, 20, 10)));
    }

    #[test]
    fn test_full_ownership_all_still() {
        let map = GameMap::filled(4, 4, Cell::owned(1, 255, 1)).unwrap();
        let field = FlowField::compute(&map, 1);
        let actions = plan_moves(&map, 1, &field, &ThresholdPolicy::default()).unwrap();
        assert_eq!(actions.len(), 16);
        assert!(actions.iter().all(|a| a.direction == Direction::Still));
    }

    #[test]
    fn test_plan_action_rejects_foreign_cell() {
        let map = center_map(200, 10);
        let field = FlowField::compute(&map, 1);
        let policy = ThresholdPolicy::default();
        assert_eq!(
            plan_action(&map, 1, &field, &policy, Coord::new(0, 0)),
            Err(FlowError::InvalidAction { x: 0, y: 0 })
        );
        assert_eq!(
            plan_action(&map, 1, &field, &policy, Coord::new(5, 5)),
            Err(FlowError::InvalidAction { x: 5, y: 5 })
        );
    }

    #[test]
    fn test_action_set_validation() {
        let map = center_map(200, 10);
        let mut actions = ActionSet::new();
        let center = Coord::new(1, 1);

        actions.insert(&map, 1, Action::new(center, Direction::West)).unwrap();
        assert_eq!(
            actions.insert(&map, 1, Action::new(center, Direction::East)),
            Err(FlowError::DuplicateAction { x: 1, y: 1 })
        );
        assert_eq!(
            actions.insert(&map, 2, Action::new(Coord::new(0, 1), Direction::East)),
            Err(FlowError::InvalidAction { x: 0, y: 1 })
        );
        assert_eq!(actions.len(), 1);
        assert_eq!(actions.get(center), Some(Action::new(center, Direction::West)));
        assert_eq!(actions.moving_count(), 1);
    }

    #[test]
    fn test_hold() {
        let map = center_map(200, 10);
        let actions = ActionSet::hold(&map, 1);
        assert_eq!(actions.as_slice(), &[Action::new(Coord::new(1, 1), Direction::Still)]);
        assert!(ActionSet::hold(&map, 7).is_empty());
    }

    #[test]
    fn test_get_finds_each_position() {
        let map = GameMap::filled(6, 5, Cell::owned(1, 100, 1)).unwrap();
        let mut actions = ActionSet::new();
        for (n, coord) in map.coords().enumerate() {
            let direction = Direction::CARDINALS[n % 4];
            actions.insert(&map, 1, Action::new(coord, direction)).unwrap();
        }

        for (n, coord) in map.coords().enumerate() {
            let expected = Action::new(coord, Direction::CARDINALS[n % 4]);
            assert_eq!(actions.get(coord), Some(expected));
        }
        assert_eq!(actions.get(Coord::new(6, 0)), None);

        let held = ActionSet::hold(&map, 1);
        assert_eq!(held.get(Coord::new(5, 4)).map(|a| a.direction), Some(Direction::Still));
    }
}
