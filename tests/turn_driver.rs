//! Multi-turn tests for the game loop.
//!
//! A scripted driver feeds prepared snapshots and records what the bot
//! submits; the stdio driver is exercised over in-memory buffers.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::fmt;
use std::io::Cursor;
use std::time::Duration;

use floodbot::protocol::{StdioDriver, encode_frame};
use floodbot::turn::RunError;
use floodbot::{
    ActionSet, Bot, Cell, Coord, Direction, FallbackMode, FlowError, GameMap, MovePolicy,
    PlayerId, RunOptions, ThresholdPolicy, TurnDriver, run_game,
};

#[derive(Debug)]
struct ScriptError;

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script exhausted")
    }
}

impl std::error::Error for ScriptError {}

/// Serves queued snapshots, then either ends the game or fails.
struct ScriptedDriver {
    player: PlayerId,
    snapshots: VecDeque<GameMap>,
    fail_when_empty: bool,
    submitted: Vec<ActionSet>,
}

impl ScriptedDriver {
    fn new(player: PlayerId, snapshots: Vec<GameMap>) -> Self {
        Self {
            player,
            snapshots: snapshots.into(),
            fail_when_empty: false,
            submitted: Vec::new(),
        }
    }
}

impl TurnDriver for ScriptedDriver {
    type Error = ScriptError;

    fn player(&self) -> PlayerId {
        self.player
    }

    fn next_snapshot(&mut self) -> Result<Option<GameMap>, ScriptError> {
        match self.snapshots.pop_front() {
            Some(map) => Ok(Some(map)),
            None if self.fail_when_empty => Err(ScriptError),
            None => Ok(None),
        }
    }

    fn submit(&mut self, actions: &ActionSet) -> Result<(), ScriptError> {
        self.submitted.push(actions.clone());
        Ok(())
    }
}

/// 3x3 board, player 1 owns the center at the given strength.
fn center_map(strength: u8) -> GameMap {
    let mut cells = vec![Cell::unowned(5, 2); 9];
    cells[4] = Cell::owned(1, strength, 10);
    GameMap::new(3, 3, cells).unwrap()
}

#[test]
fn test_plays_every_snapshot() {
    let mut driver = ScriptedDriver::new(1, vec![center_map(40), center_map(200), center_map(255)]);
    let bot = Bot::new(1, ThresholdPolicy::default());

    let summary = run_game(&mut driver, &bot, RunOptions::default()).unwrap();

    assert_eq!(summary.turns, 3);
    assert_eq!(summary.fallback_turns, 0);
    let moves: Vec<Direction> = driver
        .submitted
        .iter()
        .map(|set| set.get(Coord::new(1, 1)).unwrap().direction)
        .collect();
    assert_eq!(moves, vec![Direction::Still, Direction::North, Direction::North]);
}

#[test]
fn test_dimension_change_aborts() {
    let wrong = GameMap::filled(4, 4, Cell::owned(1, 1, 1)).unwrap();
    let mut driver = ScriptedDriver::new(1, vec![center_map(40), wrong]);
    let bot = Bot::new(1, ThresholdPolicy::default());

    let err = run_game(&mut driver, &bot, RunOptions::default()).unwrap_err();
    match err {
        RunError::Turn { turn, source } => {
            assert_eq!(turn, 1);
            assert!(matches!(
                source,
                FlowError::MalformedSnapshot {
                    width: 3,
                    height: 3,
                    cells: 16
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(driver.submitted.len(), 1);
}

#[test]
fn test_dimension_change_holds_still() {
    let wrong = GameMap::filled(2, 2, Cell::owned(1, 255, 1)).unwrap();
    let mut driver = ScriptedDriver::new(1, vec![center_map(200), wrong, center_map(200)]);
    let bot = Bot::new(1, ThresholdPolicy::default());
    let options = RunOptions {
        fallback: FallbackMode::HoldStill,
        ..RunOptions::default()
    };

    let summary = run_game(&mut driver, &bot, options).unwrap();

    assert_eq!(summary.turns, 3);
    assert_eq!(summary.fallback_turns, 1);
    let held = &driver.submitted[1];
    assert_eq!(held.len(), 4);
    assert!(held.iter().all(|a| a.direction == Direction::Still));
    assert_eq!(driver.submitted[2].moving_count(), 1);
}

#[test]
fn test_driver_error_surfaces() {
    let mut driver = ScriptedDriver::new(1, vec![center_map(40)]);
    driver.fail_when_empty = true;
    let bot = Bot::new(1, ThresholdPolicy::default());

    let err = run_game(&mut driver, &bot, RunOptions::default()).unwrap_err();
    assert!(matches!(err, RunError::Driver(_)));
    assert!(err.to_string().contains("script exhausted"));
}

/// Threshold policy that stalls for a fixed time on every decision.
struct StallingPolicy(Duration);

impl MovePolicy for StallingPolicy {
    fn decide(&self, cell: &Cell, toward_frontier: Option<Direction>) -> Direction {
        std::thread::sleep(self.0);
        ThresholdPolicy::default().decide(cell, toward_frontier)
    }
}

#[test]
fn test_turns_over_budget_are_counted() {
    let mut driver = ScriptedDriver::new(1, vec![center_map(200); 3]);
    let bot = Bot::new(1, StallingPolicy(Duration::from_millis(5)));
    let options = RunOptions {
        turn_budget: Some(Duration::from_millis(1)),
        ..RunOptions::default()
    };

    let summary = run_game(&mut driver, &bot, options).unwrap();
    assert_eq!(summary.turns, 3);
    assert_eq!(summary.slow_turns, 3);
    assert!(summary.max_turn_time >= Duration::from_millis(5));
    // Overruns are reported, never acted on.
    assert!(driver.submitted.iter().all(|set| set.moving_count() == 1));
}

#[test]
fn test_turns_within_budget_are_not_counted() {
    let mut driver = ScriptedDriver::new(1, vec![center_map(200); 3]);
    let bot = Bot::new(1, ThresholdPolicy::default());
    let options = RunOptions {
        turn_budget: Some(Duration::from_secs(60)),
        ..RunOptions::default()
    };

    let summary = run_game(&mut driver, &bot, options).unwrap();
    assert_eq!(summary.turns, 3);
    assert_eq!(summary.slow_turns, 0);
}

#[test]
fn test_stdio_session() {
    let first = center_map(200);
    let mut second_cells = first.cells().to_vec();
    second_cells[1] = Cell::owned(1, 0, 2);
    let second = GameMap::new(3, 3, second_cells).unwrap();

    let productions: Vec<String> = first.cells().iter().map(|c| c.production.to_string()).collect();
    let input = format!(
        "1\n3 3\n{}\n{}\n{}\n",
        productions.join(" "),
        encode_frame(&first),
        encode_frame(&second)
    );

    let mut output = Vec::new();
    let mut driver = StdioDriver::connect(Cursor::new(input), &mut output, "TestBot").unwrap();
    assert_eq!(driver.player(), 1);
    assert_eq!(driver.dimensions(), (3, 3));

    let bot = Bot::new(driver.player(), ThresholdPolicy::default());
    let summary = run_game(&mut driver, &bot, RunOptions::default()).unwrap();
    assert_eq!(summary.turns, 2);
    drop(driver);

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "TestBot");
    // Turn 1: center moves north.
    assert_eq!(lines[1], "1 1 1");
    // Turn 2: (1,0) is now owned and weak; the center is reached from (0,1) first.
    assert_eq!(lines[2], "1 0 0 1 1 4");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_stdio_truncated_handshake() {
    let err = StdioDriver::connect(Cursor::new("1\n3 3\n"), Vec::new(), "TestBot").unwrap_err();
    assert!(err.to_string().contains("productions"));
}
