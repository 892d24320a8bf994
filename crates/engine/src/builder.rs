// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fluent rule registration, entered through [`Engine::mock`].

use crate::engine::Engine;
use crate::error::Error;
use crate::matcher::MatchSpec;
use crate::request::infer_provider;
use crate::response::MockResponse;
use crate::rules::{RuleId, RuleSpec};

/// Builder for one mock rule.
///
/// Terminal calls ([`respond`](MockBuilder::respond),
/// [`respond_sequence`](MockBuilder::respond_sequence)) validate and
/// register the rule, returning its id.
#[derive(Debug)]
#[must_use = "a builder registers nothing until respond() is called"]
pub struct MockBuilder {
    engine: Engine,
    provider: Option<String>,
    model: String,
    spec: MatchSpec,
}

impl MockBuilder {
    pub(crate) fn new(engine: Engine, model: impl Into<String>) -> Self {
        Self {
            engine,
            provider: None,
            model: model.into(),
            spec: MatchSpec::any(),
        }
    }

    /// Target an explicit provider instead of the one inferred from the
    /// model name.
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Replace the match criteria; without this the rule matches every
    /// request for its provider and model.
    pub fn when(mut self, spec: MatchSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Register with a single response, repeated for every matching
    /// call.
    pub fn respond(self, response: impl Into<MockResponse>) -> Result<RuleId, Error> {
        self.respond_sequence([response.into()])
    }

    /// Register with an ordered response sequence, consumed per the
    /// configured sequence policy.
    pub fn respond_sequence<I>(self, responses: I) -> Result<RuleId, Error>
    where
        I: IntoIterator,
        I::Item: Into<MockResponse>,
    {
        let provider = self
            .provider
            .unwrap_or_else(|| infer_provider(&self.model).to_string());
        self.engine.register_rule(RuleSpec {
            provider,
            model: self.model,
            matcher: self.spec,
            responses: responses.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
