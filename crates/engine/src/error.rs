// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy.
//!
//! Every failure surfaces synchronously on the call that caused it;
//! there are no internal retries. Messages carry the provider, model,
//! and a truncated request summary so a failing test names the call
//! that went unanswered.

use thiserror::Error;
use understudy_replay::TapeError;

/// Errors raised by dispatch, rule registration, and session
/// transitions.
#[derive(Debug, Error)]
pub enum Error {
    /// No rule matched and the fallback policy is `error`.
    #[error("no mock matched call to {provider}/{model}: {summary}")]
    NoMockMatch {
        provider: String,
        model: String,
        summary: String,
    },

    /// An active replay session has no entry for this request.
    ///
    /// Always fatal to the call; rules are never consulted while
    /// replaying.
    #[error(
        "replay miss on session '{session}' for {provider}/{model} \
         (fingerprint {fingerprint}): {summary}"
    )]
    ReplayMiss {
        session: String,
        provider: String,
        model: String,
        fingerprint: String,
        summary: String,
    },

    /// A rule failed validation at registration time.
    #[error("invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    /// Tape persistence failure: session not found, corrupted, or io.
    #[error(transparent)]
    Tape(#[from] TapeError),
}

/// Registration-time rule validation failures.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The regex pattern failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),

    /// The semantic threshold is outside [0, 1].
    #[error("semantic threshold {0} is outside [0, 1]")]
    Threshold(f64),

    /// A response sequence with no elements.
    #[error("response sequence is empty")]
    EmptySequence,
}
