//! Benchmarks for the per-turn hot path: frontier search plus move planning.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use floodbot::mapgen::generate_map;
use floodbot::{Bot, Cell, FlowField, GameMap, ThresholdPolicy};

/// A generated map where player 1 owns a centered square covering about
/// half the board, so the search has real interior to flood.
fn mid_game_map(size: u16) -> GameMap {
    let base = generate_map(42, size, size, 2).unwrap();
    let lo = size / 4;
    let hi = size - size / 4;
    let cells: Vec<Cell> = base
        .iter()
        .map(|(coord, cell)| {
            if (lo..hi).contains(&coord.x) && (lo..hi).contains(&coord.y) {
                Cell::owned(1, cell.strength, cell.production)
            } else {
                *cell
            }
        })
        .collect();
    GameMap::new(size, size, cells).unwrap()
}

fn bench_flow_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("flow_field");
    for size in [30u16, 50] {
        let map = mid_game_map(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| black_box(FlowField::compute(black_box(map), 1)));
        });
    }
    group.finish();
}

fn bench_play_turn(c: &mut Criterion) {
    let bot = Bot::new(1, ThresholdPolicy::default());
    let mut group = c.benchmark_group("play_turn");
    for size in [30u16, 50] {
        let map = mid_game_map(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| black_box(bot.play_turn(black_box(map)).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flow_field, bench_play_turn);
criterion_main!(benches);
