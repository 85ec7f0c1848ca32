//! CLI command implementations for Floodbot.

pub(crate) mod generate;
pub(crate) mod plan;
pub(crate) mod play;

mod output;

use clap::ValueEnum;
use floodbot::FallbackMode;
use std::error::Error;
use std::fmt;

/// Output format for the `plan` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable grids.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Command-line spelling of [`FallbackMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FallbackArg {
    /// Stop the game on the first failed turn.
    Abort,
    /// Hold every cell still and keep playing.
    HoldStill,
}

impl From<FallbackArg> for FallbackMode {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Abort => FallbackMode::Abort,
            FallbackArg::HoldStill => FallbackMode::HoldStill,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<floodbot::config::ConfigError> for CliError {
    fn from(e: floodbot::config::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<floodbot::protocol::ProtocolError> for CliError {
    fn from(e: floodbot::protocol::ProtocolError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<floodbot::turn::RunError> for CliError {
    fn from(e: floodbot::turn::RunError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<floodbot::snapshot::SnapshotError> for CliError {
    fn from(e: floodbot::snapshot::SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<floodbot::mapgen::MapGenError> for CliError {
    fn from(e: floodbot::mapgen::MapGenError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<floodbot::FlowError> for CliError {
    fn from(e: floodbot::FlowError) -> Self {
        Self::new(e.to_string())
    }
}
