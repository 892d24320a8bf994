// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle: idle, recording, replaying.
//!
//! At most one session is active per engine. Transitions finalize the
//! previous session before the new mode starts, so a tape is flushed
//! even when the caller jumps straight from one session into another.

use crate::engine::Engine;
use crate::error::Error;
use crate::fallback::FallbackPolicy;
use std::fmt;
use understudy_replay::SessionTape;

/// Public view of the engine's lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// Rules and fallback only.
    Idle,
    /// Capturing traffic onto the named tape.
    Recording(String),
    /// Serving exclusively from the named tape.
    Replaying(String),
}

impl SessionMode {
    /// Session name, when one is active.
    pub fn name(&self) -> Option<&str> {
        match self {
            SessionMode::Idle => None,
            SessionMode::Recording(name) | SessionMode::Replaying(name) => Some(name),
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Idle => write!(f, "idle"),
            SessionMode::Recording(name) => write!(f, "recording '{name}'"),
            SessionMode::Replaying(name) => write!(f, "replaying '{name}'"),
        }
    }
}

/// Internal lifecycle state, tape included.
#[derive(Debug)]
pub(crate) enum SessionState {
    Idle,
    Recording(RecordingSession),
    Replaying(ReplaySession),
}

impl SessionState {
    pub(crate) fn mode(&self) -> SessionMode {
        match self {
            SessionState::Idle => SessionMode::Idle,
            SessionState::Recording(session) => SessionMode::Recording(session.name.clone()),
            SessionState::Replaying(session) => SessionMode::Replaying(session.name.clone()),
        }
    }
}

/// An open recording: a fresh tape plus the fallback to restore.
#[derive(Debug)]
pub(crate) struct RecordingSession {
    pub(crate) name: String,
    pub(crate) tape: SessionTape,
    pub(crate) prior_fallback: FallbackPolicy,
}

/// An open replay: the loaded tape, read-only.
#[derive(Debug)]
pub(crate) struct ReplaySession {
    pub(crate) name: String,
    pub(crate) tape: SessionTape,
}

/// Guard tying a session to a scope.
///
/// Dropping the guard finalizes its session if that session is still
/// the active one; [`SessionScope::finish`] does the same but surfaces
/// the flush `Result`. The guard is a convenience: transitions and
/// [`Engine::stop_session`] finalize with or without it.
#[must_use = "dropping the scope immediately would finalize the session at once"]
pub struct SessionScope {
    engine: Engine,
    mode: SessionMode,
    epoch: u64,
    armed: bool,
}

impl SessionScope {
    pub(crate) fn new(engine: Engine, mode: SessionMode, epoch: u64) -> Self {
        Self {
            engine,
            mode,
            epoch,
            armed: true,
        }
    }

    /// The session this scope guards.
    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    /// Session name.
    pub fn name(&self) -> &str {
        self.mode.name().unwrap_or_default()
    }

    /// Finalize now, surfacing any tape flush error.
    pub fn finish(mut self) -> Result<(), Error> {
        self.armed = false;
        self.engine.finalize_epoch(self.epoch)
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        if self.armed {
            // best effort; finish() exists for callers who need the Result
            let _ = self.engine.finalize_epoch(self.epoch);
        }
    }
}

impl fmt::Debug for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionScope")
            .field("mode", &self.mode)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
