// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fallback policy for unmatched calls.

use serde::{Deserialize, Serialize};

/// Engine-wide behavior when no rule matches and no replay entry
/// applies.
///
/// Entering a recording session forces the effective policy to
/// `pass_through`; the configured policy comes back when the session
/// finalizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Fail the call with `NoMockMatch`.
    #[default]
    Error,
    /// Answer with the neutral empty response.
    Default,
    /// Hand the call to the real backend.
    PassThrough,
}
