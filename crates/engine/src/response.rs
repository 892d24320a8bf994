// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mock response model and its tape form.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use understudy_replay::{TapeEntry, TapeToolCall};

/// A tool invocation carried by a response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name.
    pub name: String,

    /// Structured arguments.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub args: Value,
}

impl ToolCall {
    /// A call with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Value::Null,
        }
    }

    /// A call with structured arguments.
    pub fn with_args(name: impl Into<String>, args: Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Response returned for an intercepted call.
///
/// [`MockResponse::empty`] is the neutral answer the `default` fallback
/// produces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MockResponse {
    /// Text content.
    #[serde(default)]
    pub text: String,

    /// Optional reasoning text alongside the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Names of tools the response advertises as available.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    /// Tool calls the response makes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl MockResponse {
    /// A plain text response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The neutral empty response.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach reasoning text.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Attach a tool call.
    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    /// Whether any tool call matches `name`.
    pub fn called_tool(&self, name: &str) -> bool {
        self.tool_calls.iter().any(|call| call.name == name)
    }

    /// Tape form of this response.
    ///
    /// Text and tool calls map directly; everything else rides in
    /// `raw_metadata` together with the capture context.
    pub fn to_tape_entry(&self, provider: &str, model: &str, mocked: bool) -> TapeEntry {
        TapeEntry {
            text: self.text.clone(),
            tool_calls: self
                .tool_calls
                .iter()
                .map(|call| TapeToolCall {
                    name: call.name.clone(),
                    args: call.args.clone(),
                })
                .collect(),
            raw_metadata: json!({
                "provider": provider,
                "model": model,
                "mocked": mocked,
                "reasoning": self.reasoning,
                "tools": self.tools,
            }),
        }
    }

    /// Rebuild a response from its tape form.
    pub fn from_tape_entry(entry: &TapeEntry) -> Self {
        let reasoning = entry
            .raw_metadata
            .get("reasoning")
            .and_then(Value::as_str)
            .map(str::to_string);
        let tools = entry
            .raw_metadata
            .get("tools")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            text: entry.text.clone(),
            reasoning,
            tools,
            tool_calls: entry
                .tool_calls
                .iter()
                .map(|call| ToolCall {
                    name: call.name.clone(),
                    args: call.args.clone(),
                })
                .collect(),
        }
    }
}

impl From<&str> for MockResponse {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for MockResponse {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
