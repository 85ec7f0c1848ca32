// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Floodbot: a frontier flow-field bot for toroidal territory games.
//!
//! Each turn the bot:
//! - receives a snapshot of the board ([`GameMap`])
//! - runs a multi-source breadth-first search from every cell it does not
//!   own ([`FlowField`])
//! - asks a [`MovePolicy`] whether each owned cell should hold or advance
//!   toward the frontier
//! - returns one [`Action`] per owned cell
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Turn driver (protocol adapter)    │
//! ├─────────────────────────────────────┤
//! │   Move policy  →  ActionSet         │
//! ├─────────────────────────────────────┤
//! │   Frontier BFS →  FlowField         │
//! ├─────────────────────────────────────┤
//! │   Grid map model (GameMap)          │
//! └─────────────────────────────────────┘
//! ```
//!
//! The bottom three layers are pure and single-threaded. The protocol
//! adapter in [`protocol`] is one possible [`TurnDriver`].

pub mod config;
pub mod error;
pub mod flow;
pub mod grid;
pub mod mapgen;
pub mod policy;
pub mod protocol;
pub mod render;
pub mod snapshot;
pub mod turn;

pub use error::{FlowError, FlowResult};

// Re-export key types at crate root for convenience
pub use config::BotConfig;
pub use flow::FlowField;
pub use grid::{Cell, Coord, Direction, GameMap, PlayerId};
pub use policy::{Action, ActionSet, MovePolicy, PolicyConfig, ThresholdPolicy};
pub use snapshot::Snapshot;
pub use turn::{Bot, FallbackMode, RunOptions, TurnDriver, run_game};
