//! Bot configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::PolicyConfig;
use crate::turn::{FallbackMode, RunOptions};

/// Name announced to the game server when none is configured.
pub const DEFAULT_BOT_NAME: &str = "FloodBot";

/// Everything tunable about a bot, loadable from JSON.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Name sent during the handshake.
    pub name: String,
    /// Move policy tunables.
    pub policy: PolicyConfig,
    /// Behaviour when a turn fails.
    pub fallback: FallbackMode,
    /// Warn when a turn takes longer than this many milliseconds.
    pub turn_budget_ms: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BOT_NAME.to_string(),
            policy: PolicyConfig::default(),
            fallback: FallbackMode::default(),
            turn_budget_ms: None,
        }
    }
}

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not a valid configuration.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: serde_json::Error,
    },
}

impl BotConfig {
    /// Load a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Options for [`crate::turn::run_game`].
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            fallback: self.fallback,
            turn_budget: self.turn_budget_ms.map(Duration::from_millis),
        }
    }
}
