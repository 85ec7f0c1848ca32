//! Plain-text views of a flow field and an action set.

#![allow(clippy::format_push_string)]

use crate::flow::FlowField;
use crate::grid::{Direction, GameMap, PlayerId};
use crate::policy::ActionSet;

/// Glyph for a move.
#[must_use]
pub const fn direction_glyph(direction: Direction) -> char {
    match direction {
        Direction::Still => 'o',
        Direction::North => '^',
        Direction::East => '>',
        Direction::South => 'v',
        Direction::West => '<',
    }
}

/// Glyph for a cell the acting player does not own.
fn foreign_glyph(owner: Option<PlayerId>) -> char {
    if owner.is_some() { '#' } else { '-' }
}

/// Render the flow field for `player`.
///
/// Output format:
/// ```text
/// Flow field for player 1 (5x3)
/// - - ^ - -
/// - < ^ > #
/// - - - - #
///
/// Legend: ^>v<=toward frontier  .=unreachable  -=unowned  #=enemy
/// ```
#[must_use]
pub fn render_flow(map: &GameMap, player: PlayerId, field: &FlowField) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Flow field for player {player} ({}x{})\n",
        map.width(),
        map.height()
    ));

    render_rows(&mut output, map, |coord, cell| {
        if cell.is_owned_by(player) {
            field.direction(coord).map_or('.', direction_glyph)
        } else {
            foreign_glyph(cell.owner)
        }
    });

    output.push_str("\nLegend: ^>v<=toward frontier  .=unreachable  -=unowned  #=enemy\n");
    output
}

/// Render the moves in `actions` on top of `map`.
///
/// Owned cells without an action render as `?`.
#[must_use]
pub fn render_actions(map: &GameMap, player: PlayerId, actions: &ActionSet) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Moves for player {player}: {} of {} cells moving\n",
        actions.moving_count(),
        actions.len()
    ));

    render_rows(&mut output, map, |coord, cell| {
        if cell.is_owned_by(player) {
            actions
                .get(coord)
                .map_or('?', |action| direction_glyph(action.direction))
        } else {
            foreign_glyph(cell.owner)
        }
    });

    output
}

fn render_rows<F>(output: &mut String, map: &GameMap, mut glyph: F)
where
    F: FnMut(crate::grid::Coord, &crate::grid::Cell) -> char,
{
    let width = usize::from(map.width());
    for (idx, (coord, cell)) in map.iter().enumerate() {
        output.push(glyph(coord, cell));
        output.push(if (idx + 1) % width == 0 { '\n' } else { ' ' });
    }
}
