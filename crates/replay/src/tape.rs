// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable session tapes.
//!
//! A tape is one JSON file per session name: a small header plus a map
//! from request fingerprint to the response captured for it. Loading is
//! all-or-nothing; a file that fails to parse is reported as corrupted
//! rather than partially applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current tape file format version.
pub const TAPE_VERSION: u32 = 1;

/// Errors raised by tape persistence.
#[derive(Debug, Error)]
pub enum TapeError {
    /// No stored tape exists for the requested session name.
    #[error("session '{name}' not found (no tape at {})", path.display())]
    SessionNotFound { name: String, path: PathBuf },

    /// A tape file exists but cannot be understood.
    #[error("session tape {} is corrupted: {reason}", path.display())]
    SessionCorrupted { path: PathBuf, reason: String },

    /// Filesystem failure reading or writing a tape.
    #[error("tape io failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A tool invocation captured on a tape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeToolCall {
    /// Tool name.
    pub name: String,
    /// Structured arguments as the backend reported them.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub args: serde_json::Value,
}

/// One captured response, keyed by its request fingerprint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TapeEntry {
    /// Response text content.
    #[serde(default)]
    pub text: String,

    /// Tool calls the response carried.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<TapeToolCall>,

    /// Provider, model, mocked flag, and any host extras; opaque here.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub raw_metadata: serde_json::Value,
}

/// In-memory tape for one named session.
///
/// Entries are kept sorted by fingerprint so the serialized file is
/// byte-stable for a given set of captures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionTape {
    /// Tape format version; files with a different version fail to load.
    pub version: u32,

    /// When the recording was finalized.
    pub recorded_at: DateTime<Utc>,

    /// Fingerprint to captured response.
    #[serde(default)]
    pub entries: BTreeMap<String, TapeEntry>,
}

impl SessionTape {
    /// An empty tape stamped with the current time.
    pub fn new() -> Self {
        Self {
            version: TAPE_VERSION,
            recorded_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    /// File path of the tape for `name` under `dir`.
    pub fn path_for(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.json"))
    }

    /// Load the tape for `name` from `dir`.
    ///
    /// A missing file is `SessionNotFound`; anything unparseable is
    /// `SessionCorrupted`.
    pub fn open(dir: &Path, name: &str) -> Result<Self, TapeError> {
        let path = Self::path_for(dir, name);
        if !path.exists() {
            return Err(TapeError::SessionNotFound {
                name: name.to_string(),
                path,
            });
        }
        Self::load(&path)
    }

    /// Load a tape from an explicit file path.
    pub fn load(path: &Path) -> Result<Self, TapeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TapeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tape: Self =
            serde_json::from_str(&raw).map_err(|e| TapeError::SessionCorrupted {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if tape.version != TAPE_VERSION {
            return Err(TapeError::SessionCorrupted {
                path: path.to_path_buf(),
                reason: format!("unsupported tape version {}", tape.version),
            });
        }
        Ok(tape)
    }

    /// Write the tape to `path`, creating parent directories as needed.
    ///
    /// An existing file is overwritten; re-recording a session name
    /// replaces its tape wholesale.
    pub fn save(&self, path: &Path) -> Result<(), TapeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TapeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| TapeError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::InvalidData, e),
        })?;
        std::fs::write(path, json).map_err(|source| TapeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Store `entry` under `fingerprint`, replacing any previous capture.
    pub fn put(&mut self, fingerprint: impl Into<String>, entry: TapeEntry) {
        self.entries.insert(fingerprint.into(), entry);
    }

    /// Look up a captured response by fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<&TapeEntry> {
        self.entries.get(fingerprint)
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SessionTape {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tape_tests.rs"]
mod tests;
