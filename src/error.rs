//! Error types for the turn computation.

use thiserror::Error;

/// Errors raised while building a snapshot or planning a turn.
///
/// All of these are fatal to the turn that produced them. Whether the game
/// continues is decided by the caller (see [`crate::turn::FallbackMode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Declared dimensions disagree with the supplied cells.
    #[error("malformed snapshot: {width}x{height} map with {cells} cells")]
    MalformedSnapshot {
        /// Declared width.
        width: u16,
        /// Declared height.
        height: u16,
        /// Number of cells actually supplied.
        cells: usize,
    },
    /// A raw direction code outside `0..=4`.
    #[error("invalid direction code {0} (expected 0..=4)")]
    InvalidDirection(u8),
    /// An action referenced a position the acting player does not own.
    #[error("invalid action at ({x}, {y}): position not owned by acting player")]
    InvalidAction {
        /// X coordinate of the rejected action.
        x: u16,
        /// Y coordinate of the rejected action.
        y: u16,
    },
    /// A second action for a position that already has one.
    #[error("duplicate action at ({x}, {y})")]
    DuplicateAction {
        /// X coordinate of the rejected action.
        x: u16,
        /// Y coordinate of the rejected action.
        y: u16,
    },
}

/// Result type for turn computations.
pub type FlowResult<T> = Result<T, FlowError>;
