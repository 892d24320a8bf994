// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-rule response sequencing.

use serde::{Deserialize, Serialize};

/// What happens when a response sequence runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Keep returning the final element.
    #[default]
    Clamp,
    /// Wrap back to the first element.
    Cycle,
}

/// Call counter selecting successive elements of a response sequence.
///
/// Advances exactly once per successful match of the owning rule and
/// never decrements. Select-and-advance is one step; the engine holds
/// its lock around it.
#[derive(Clone, Debug)]
pub struct SequenceCursor {
    index: usize,
    len: usize,
    policy: SequencePolicy,
}

impl SequenceCursor {
    /// Cursor over a sequence of `len` elements.
    ///
    /// Registration rejects empty sequences, so `len` is at least 1.
    pub fn new(len: usize, policy: SequencePolicy) -> Self {
        Self {
            index: 0,
            len: len.max(1),
            policy,
        }
    }

    /// Select the element for the current match and advance one step.
    pub fn advance(&mut self) -> usize {
        let selected = match self.policy {
            SequencePolicy::Clamp => self.index.min(self.len - 1),
            SequencePolicy::Cycle => self.index % self.len,
        };
        self.index = self.index.saturating_add(1);
        selected
    }

    /// Element the next match would select, without advancing.
    pub fn peek(&self) -> usize {
        match self.policy {
            SequencePolicy::Clamp => self.index.min(self.len - 1),
            SequencePolicy::Cycle => self.index % self.len,
        }
    }

    /// Matches served so far.
    pub fn calls(&self) -> usize {
        self.index
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; sequences have at least one element.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
