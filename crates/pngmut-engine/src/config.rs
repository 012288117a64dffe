//! Engine configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! slack = 4096
//! min_mutable_len = 20
//! length_delta_max = 256
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::ops::OpParams;
use crate::wire::{CHUNK_OVERHEAD, SIGNATURE_LEN};

/// Smallest input the operations can safely handle: signature + one empty chunk.
pub const MIN_MUTABLE_LEN: usize = SIGNATURE_LEN + CHUNK_OVERHEAD;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("min_mutable_len must be at least 20, got {0}")]
    MinLenTooSmall(usize),
    #[error("length_delta_max must be non-zero")]
    ZeroLengthDelta,
}

// ── Configuration ───────────────────────────────────────────────────

/// Mutation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MutatorConfig {
    /// Extra capacity reserved beyond the candidate length, so chunk
    /// duplication has room to grow the stream.
    pub slack: usize,
    /// Recognised inputs shorter than this are copied through unchanged.
    pub min_mutable_len: usize,
    /// Exclusive bound of the random delta used by length tampering.
    pub length_delta_max: u32,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        MutatorConfig {
            slack: 4096,
            min_mutable_len: MIN_MUTABLE_LEN,
            length_delta_max: 256,
        }
    }
}

impl MutatorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: MutatorConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_mutable_len < MIN_MUTABLE_LEN {
            return Err(ConfigError::MinLenTooSmall(self.min_mutable_len));
        }
        if self.length_delta_max == 0 {
            return Err(ConfigError::ZeroLengthDelta);
        }
        Ok(())
    }

    /// Capacity for a candidate of `input_len` bytes under a host maximum of `max_size`.
    pub fn growth_target(&self, input_len: usize, max_size: usize) -> usize {
        input_len.saturating_add(self.slack).min(max_size)
    }

    pub(crate) fn op_params(&self) -> OpParams {
        OpParams {
            length_delta_max: self.length_delta_max,
        }
    }
}
