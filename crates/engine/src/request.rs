// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Intercepted call description.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Characters of primary text kept in error summaries.
const SUMMARY_CHARS: usize = 200;

/// One intercepted outbound call.
///
/// Immutable once constructed. The payload is the provider-bound
/// request body as structured JSON; the engine never interprets it
/// beyond [`CallRequest::primary_text`] and never mutates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Provider id, e.g. `openai` or `anthropic`.
    pub provider: String,

    /// Model id the call targets.
    pub model: String,

    /// Structured request payload.
    pub payload: Value,
}

impl CallRequest {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, payload: Value) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            payload,
        }
    }

    /// A request whose payload is a single `prompt` string.
    pub fn prompt(
        provider: impl Into<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self::new(
            provider,
            model,
            serde_json::json!({ "prompt": prompt.into() }),
        )
    }

    /// The text matchers run against.
    ///
    /// Probes the payload shapes providers actually send: a `prompt`
    /// string, a `messages` list (chat form), an `input` string, and
    /// finally the serialized payload itself so an unknown shape still
    /// matches *something*.
    pub fn primary_text(&self) -> String {
        if let Some(Value::String(prompt)) = self.payload.get("prompt") {
            return prompt.clone();
        }
        if let Some(messages) = self.payload.get("messages") {
            return flatten_messages(messages);
        }
        if let Some(Value::String(input)) = self.payload.get("input") {
            return input.clone();
        }
        self.payload.to_string()
    }

    /// Primary text truncated for error messages.
    pub fn summary(&self) -> String {
        let text = self.primary_text();
        match text.char_indices().nth(SUMMARY_CHARS) {
            Some((idx, _)) => format!("{}…", &text[..idx]),
            None => text,
        }
    }
}

/// Infer a provider id from a model name.
///
/// Recognizes the Anthropic and Google families by substring; anything
/// else is treated as OpenAI-compatible.
pub fn infer_provider(model: &str) -> &'static str {
    let model = model.to_lowercase();
    if model.contains("claude") || model.contains("anthropic") {
        "anthropic"
    } else if model.contains("gemini") || model.contains("google") {
        "google"
    } else {
        "openai"
    }
}

/// Flatten a chat `messages` value into newline-joined text.
///
/// Handles plain strings, `{content: "..."}` objects, and content block
/// lists carrying `text` fields. Non-text content is serialized rather
/// than dropped.
fn flatten_messages(messages: &Value) -> String {
    match messages {
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(text) => parts.push(text.clone()),
                    Value::Object(message) => match message.get("content") {
                        Some(Value::String(text)) => parts.push(text.clone()),
                        Some(Value::Array(blocks)) => {
                            for block in blocks {
                                if let Some(Value::String(text)) = block.get("text") {
                                    parts.push(text.clone());
                                }
                            }
                        }
                        Some(Value::Null) | None => {}
                        Some(other) => parts.push(other.to_string()),
                    },
                    other => parts.push(other.to_string()),
                }
            }
            parts.join("\n")
        }
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
