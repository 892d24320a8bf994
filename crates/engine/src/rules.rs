// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rule registry: ordered mock rules with last-registered-first
//! matching.

use crate::config::EngineConfig;
use crate::error::RuleError;
use crate::matcher::{CompiledMatcher, MatchSpec};
use crate::request::CallRequest;
use crate::response::MockResponse;
use crate::sequence::SequenceCursor;
use serde::{Deserialize, Serialize};

/// Identifier of a registered rule; its registration order index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(usize);

impl RuleId {
    /// Registration order, starting at zero.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An unregistered rule description, validated on registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Provider the rule targets.
    pub provider: String,

    /// Model the rule targets; must equal the request's model exactly.
    pub model: String,

    /// Matcher criteria.
    #[serde(default)]
    pub matcher: MatchSpec,

    /// Response sequence; a single response is a one-element sequence.
    pub responses: Vec<MockResponse>,
}

/// One registered expectation.
///
/// Immutable after registration except for its sequence cursor.
#[derive(Debug)]
pub struct MockRule {
    id: RuleId,
    provider: String,
    model: String,
    matcher: CompiledMatcher,
    responses: Vec<MockResponse>,
    cursor: SequenceCursor,
}

impl MockRule {
    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Matches served by this rule so far.
    pub fn call_count(&self) -> usize {
        self.cursor.calls()
    }

    fn select_and_advance(&mut self) -> MockResponse {
        let index = self.cursor.advance();
        self.responses[index].clone()
    }
}

/// Ordered rule store.
///
/// Evaluation walks rules newest-first; the first accepting rule wins,
/// so a later registration shadows an earlier one regardless of how
/// specific either matcher is.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<MockRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a rule, returning its id.
    pub fn register(&mut self, spec: RuleSpec, config: &EngineConfig) -> Result<RuleId, RuleError> {
        if spec.responses.is_empty() {
            return Err(RuleError::EmptySequence);
        }
        let matcher = CompiledMatcher::compile(
            &spec.matcher,
            config.semantic_threshold,
            config.case_sensitive,
        )?;
        let id = RuleId(self.rules.len());
        let cursor = SequenceCursor::new(spec.responses.len(), config.sequence_policy);
        self.rules.push(MockRule {
            id,
            provider: spec.provider,
            model: spec.model,
            matcher,
            responses: spec.responses,
            cursor,
        });
        Ok(id)
    }

    /// Find the newest rule accepting `request` and take its next
    /// response.
    ///
    /// Advances exactly the winning rule's cursor and nothing else.
    pub fn match_request(&mut self, request: &CallRequest) -> Option<(RuleId, MockResponse)> {
        let text = request.primary_text();
        for rule in self.rules.iter_mut().rev() {
            if rule.provider != request.provider || rule.model != request.model {
                continue;
            }
            if rule.matcher.matches(&text) {
                let response = rule.select_and_advance();
                return Some((rule.id, response));
            }
        }
        None
    }

    /// Look up a rule by id.
    pub fn get(&self, id: RuleId) -> Option<&MockRule> {
        self.rules.get(id.0)
    }

    /// Drop every rule and its cursor state.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
