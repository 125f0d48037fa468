//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change. Values are validated once at load time; search code trusts them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::search::move_ordering::MAX_SEARCH_PLY;
use crate::search::zobrist::DEFAULT_ZOBRIST_SEED;

const MAX_HASH_MB: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub hash_mb: usize,
    pub zobrist_seed: u64,
    pub max_depth: u8,
    pub default_movetime_ms: u64,
    pub hard_stop_margin_ms: u64,
    pub time_divisor: u64,
    pub aspiration_window: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: 128,
            zobrist_seed: DEFAULT_ZOBRIST_SEED,
            max_depth: 64,
            default_movetime_ms: 1_000,
            hard_stop_margin_ms: 50,
            time_divisor: 25,
            aspiration_window: 30,
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(text: &str) -> Result<Self, ConfigError> {
        let parsed: Self = serde_json::from_str(text)?;
        parsed.validated()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::load_from_json(&text)?;
        debug!(path = %path.display(), ?config, "engine config loaded");
        Ok(config)
    }

    /// Reject values the engine cannot run with; clamp the search depth to
    /// what the per-ply tables can hold.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.hash_mb == 0 || self.hash_mb > MAX_HASH_MB {
            return Err(ConfigError::OutOfRange {
                name: "hash_mb",
                value: self.hash_mb as u64,
            });
        }
        if self.time_divisor == 0 {
            return Err(ConfigError::OutOfRange {
                name: "time_divisor",
                value: 0,
            });
        }
        if self.aspiration_window <= 0 {
            return Err(ConfigError::OutOfRange {
                name: "aspiration_window",
                value: u64::from(self.aspiration_window.unsigned_abs()),
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_depth",
                value: 0,
            });
        }
        self.max_depth = self.max_depth.min(max_search_depth());
        Ok(self)
    }
}

/// Deepest nominal depth the search accepts.
#[inline]
pub const fn max_search_depth() -> u8 {
    (MAX_SEARCH_PLY - 1) as u8
}
