// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.

use crate::fallback::FallbackPolicy;
use crate::sequence::SequencePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default similarity threshold for semantic matchers.
pub const DEFAULT_SEMANTIC_THRESHOLD: f64 = 0.3;

/// Default tape directory, relative to the engine's working root.
pub const DEFAULT_SESSIONS_DIR: &str = ".understudy/sessions";

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Engine-wide settings.
///
/// Every field has a default, so a TOML file only needs the settings it
/// changes. Unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngineConfig {
    /// Behavior when no rule matches and no replay entry applies.
    pub fallback: FallbackPolicy,

    /// Default similarity threshold for semantic matchers, in [0, 1].
    pub semantic_threshold: f64,

    /// Whether `contains` matchers are case sensitive.
    pub case_sensitive: bool,

    /// Sequence exhaustion behavior.
    pub sequence_policy: SequencePolicy,

    /// Directory session tapes are stored in.
    pub sessions_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackPolicy::default(),
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
            case_sensitive: false,
            sequence_policy: SequencePolicy::default(),
            sessions_dir: PathBuf::from(DEFAULT_SESSIONS_DIR),
        }
    }
}

impl EngineConfig {
    /// Defaults with the tape directory rooted under `root`.
    pub fn rooted(root: &Path) -> Self {
        Self {
            sessions_dir: root.join(DEFAULT_SESSIONS_DIR),
            ..Self::default()
        }
    }

    /// Load settings from a TOML file and validate them.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// A config built directly in code skips this; a bad threshold then
    /// surfaces as `InvalidRule` when the first semantic rule registers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(ConfigError::Validation(format!(
                "semantic_threshold {} must lie within [0, 1]",
                self.semantic_threshold
            )));
        }
        Ok(())
    }

    /// Replace the tape directory.
    pub fn with_sessions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sessions_dir = dir.into();
        self
    }

    /// Replace the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
