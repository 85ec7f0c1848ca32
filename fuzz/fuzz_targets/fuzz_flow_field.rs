#![no_main]

//! Flow field fuzzer.
//!
//! Builds an arbitrary small torus, runs the frontier search for one player
//! and checks every field invariant, then plans moves and checks that each
//! owned cell got exactly one action.

use arbitrary::Arbitrary;
use floodbot::flow::check_field;
use floodbot::policy::plan_moves;
use floodbot::{Cell, FlowField, GameMap, PolicyConfig, ThresholdPolicy};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FlowInput {
    width: u8,
    height: u8,
    player: u8,
    multiplier: u16,
    /// (owner, strength, production) per cell; reused cyclically.
    cells: Vec<(u8, u8, u8)>,
}

fuzz_target!(|input: FlowInput| {
    let width = u16::from(input.width % 24).max(1);
    let height = u16::from(input.height % 24).max(1);
    let player = input.player % 4 + 1;
    if input.cells.is_empty() {
        return;
    }

    let total = usize::from(width) * usize::from(height);
    let cells: Vec<Cell> = input
        .cells
        .iter()
        .cycle()
        .take(total)
        .map(|&(owner, strength, production)| Cell {
            owner: (owner % 5 != 0).then_some(owner % 5),
            strength,
            production,
        })
        .collect();
    let map = GameMap::new(width, height, cells).unwrap();

    let field = FlowField::compute(&map, player);
    let violations = check_field(&map, player, &field);
    assert!(violations.is_empty(), "Invariants violated: {violations:?}");

    let policy = ThresholdPolicy::new(PolicyConfig {
        strength_multiplier: input.multiplier,
        ..PolicyConfig::default()
    });
    let actions = plan_moves(&map, player, &field, &policy).unwrap();
    assert_eq!(actions.len(), map.count_owned(player));
});
