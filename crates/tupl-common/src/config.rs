//! Interner configuration.
//!
//! Configuration is plain data with defaults taken from [`crate::limits`]. It can
//! be built in code or loaded from a JSON document:
//!
//! ```json
//! { "minSweepLen": 64, "sweepGrowthFactor": 2 }
//! ```
//!
//! Missing fields fall back to their defaults; unknown fields are rejected so a
//! misspelled option is reported instead of silently ignored.

use crate::limits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tuning knobs for one interning pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct InternerConfig {
    /// Weak-keyed maps below this size are never swept.
    pub min_sweep_len: usize,
    /// Next sweep threshold is `live * sweep_growth_factor` (at least `min_sweep_len`).
    pub sweep_growth_factor: usize,
}

impl Default for InternerConfig {
    fn default() -> Self {
        InternerConfig {
            min_sweep_len: limits::MIN_SWEEP_LEN,
            sweep_growth_factor: limits::SWEEP_GROWTH_FACTOR,
        }
    }
}

/// Errors produced while loading an [`InternerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid interner config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sweepGrowthFactor must be at least 1, got {0}")]
    InvalidGrowthFactor(usize),
}

impl InternerConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: InternerConfig = serde_json::from_str(text)?;
        config.validate()
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading interner config");
        Self::from_json_str(&text)
    }

    /// Reject settings that would make the sweep threshold degenerate.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.sweep_growth_factor == 0 {
            return Err(ConfigError::InvalidGrowthFactor(self.sweep_growth_factor));
        }
        Ok(self)
    }

    /// Sweep threshold for a map that has just been swept down to `live` entries.
    #[inline]
    pub fn next_sweep_at(&self, live: usize) -> usize {
        live.saturating_mul(self.sweep_growth_factor)
            .max(self.min_sweep_len)
            .max(1)
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
