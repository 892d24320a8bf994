// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agent adapters: wrap a host agent so every engine dispatch it makes
//! during a run is attributed to that run.
//!
//! The engine never calls agents on its own. A [`WrappedAgent`] drives
//! the agent and slices the shared trace around the call, so the report
//! covers exactly the dispatches the run produced.

use crate::engine::Engine;
use crate::response::ToolCall;
use crate::trace::TracedCall;
use serde_json::Value;
use std::time::{Duration, Instant};

/// How a host agent is entered, resolved once at wrap time.
///
/// All variants take the user prompt and return the agent's raw output;
/// the tag records which entry point the host exposed.
pub enum AgentHandle {
    /// The agent is itself a function of the prompt.
    Callable(Box<dyn FnMut(&str) -> Value + Send>),
    /// Object-style agent entered through an `invoke` method.
    Invoke(Box<dyn FnMut(&str) -> Value + Send>),
    /// Object-style agent entered through a `run` method.
    Run(Box<dyn FnMut(&str) -> Value + Send>),
}

impl AgentHandle {
    pub fn callable<F>(f: F) -> Self
    where
        F: FnMut(&str) -> Value + Send + 'static,
    {
        AgentHandle::Callable(Box::new(f))
    }

    pub fn invoke<F>(f: F) -> Self
    where
        F: FnMut(&str) -> Value + Send + 'static,
    {
        AgentHandle::Invoke(Box::new(f))
    }

    pub fn run<F>(f: F) -> Self
    where
        F: FnMut(&str) -> Value + Send + 'static,
    {
        AgentHandle::Run(Box::new(f))
    }

    /// Name of the resolved entry point.
    pub fn capability(&self) -> &'static str {
        match self {
            AgentHandle::Callable(_) => "callable",
            AgentHandle::Invoke(_) => "invoke",
            AgentHandle::Run(_) => "run",
        }
    }

    fn call(&mut self, prompt: &str) -> Value {
        match self {
            AgentHandle::Callable(f) | AgentHandle::Invoke(f) | AgentHandle::Run(f) => f(prompt),
        }
    }
}

impl std::fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AgentHandle")
            .field(&self.capability())
            .finish()
    }
}

/// A host agent bound to an engine, created by [`Engine::wrap`].
#[derive(Debug)]
pub struct WrappedAgent {
    engine: Engine,
    handle: AgentHandle,
}

impl WrappedAgent {
    pub(crate) fn new(engine: Engine, handle: AgentHandle) -> Self {
        Self { engine, handle }
    }

    /// Which entry point the wrapped agent resolved to.
    pub fn capability(&self) -> &'static str {
        self.handle.capability()
    }

    /// The engine this agent dispatches through.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Drive the agent once and report what it did.
    ///
    /// Trace records appended while the agent runs are attributed to
    /// this run; concurrent runs against one shared engine will see
    /// each other's calls.
    pub fn run(&mut self, prompt: &str) -> AgentReport {
        let trace = self.engine.trace();
        let mark = trace.len() as u64;
        let started = Instant::now();
        let raw = self.handle.call(prompt);
        let duration = started.elapsed();

        let calls = trace.since(mark);
        let tool_calls = calls
            .iter()
            .filter_map(|call| call.outcome.response())
            .flat_map(|response| response.tool_calls.iter().cloned())
            .collect();

        AgentReport {
            text: extract_text(&raw),
            raw,
            duration,
            calls,
            tool_calls,
        }
    }
}

/// What one [`WrappedAgent::run`] produced.
#[derive(Clone, Debug)]
pub struct AgentReport {
    /// Best-effort text view of the raw output.
    pub text: String,
    /// The agent's output as returned.
    pub raw: Value,
    /// Wall-clock time of the run.
    pub duration: Duration,
    /// Engine dispatches made during the run, oldest first.
    pub calls: Vec<TracedCall>,
    /// Tool calls carried by the responses served during the run.
    pub tool_calls: Vec<ToolCall>,
}

impl AgentReport {
    /// Number of engine dispatches the run made.
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Whether any served response called the named tool.
    pub fn called_tool(&self, name: &str) -> bool {
        self.tool_calls.iter().any(|tool| tool.name == name)
    }
}

/// Pull a human-readable answer out of an agent's raw output.
///
/// Strings pass through, objects are probed for a conventional text
/// field, anything else is rendered as JSON.
pub fn extract_text(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            for key in ["text", "content", "output", "message"] {
                if let Some(Value::String(text)) = map.get(key) {
                    return text.clone();
                }
            }
            raw.to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
