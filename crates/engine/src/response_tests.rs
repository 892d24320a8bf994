// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use serde_json::json;

#[test]
fn text_constructor_leaves_the_rest_empty() {
    let response = MockResponse::text("done");
    assert_eq!(response.text, "done");
    assert!(response.reasoning.is_none());
    assert!(response.tools.is_empty());
    assert!(response.tool_calls.is_empty());
}

#[test]
fn empty_is_the_default() {
    assert_eq!(MockResponse::empty(), MockResponse::default());
    assert_eq!(MockResponse::empty().text, "");
}

#[test]
fn called_tool_matches_by_name() {
    let response = MockResponse::text("ok")
        .with_tool_call(ToolCall::with_args("search", json!({"q": "rust"})))
        .with_tool_call(ToolCall::new("fetch"));

    assert!(response.called_tool("search"));
    assert!(response.called_tool("fetch"));
    assert!(!response.called_tool("browse"));
}

#[test]
fn tape_round_trip_preserves_everything() {
    let response = MockResponse::text("forty-two")
        .with_reasoning("deep thought")
        .with_tool_call(ToolCall::with_args("calc", json!({"x": 6, "y": 7})));

    let entry = response.to_tape_entry("openai", "gpt-4", false);
    assert_eq!(entry.text, "forty-two");
    assert_eq!(entry.raw_metadata["provider"], "openai");
    assert_eq!(entry.raw_metadata["model"], "gpt-4");
    assert_eq!(entry.raw_metadata["mocked"], false);

    let rebuilt = MockResponse::from_tape_entry(&entry);
    assert_eq!(rebuilt, response);
}

#[test]
fn mocked_flag_rides_in_metadata() {
    let entry = MockResponse::text("scripted").to_tape_entry("openai", "gpt-4", true);
    assert_eq!(entry.raw_metadata["mocked"], true);
}

#[test]
fn from_tape_entry_tolerates_foreign_metadata() {
    let entry = TapeEntry {
        text: "bare".to_string(),
        tool_calls: Vec::new(),
        raw_metadata: json!({"host": "custom", "latency_ms": 12}),
    };

    let response = MockResponse::from_tape_entry(&entry);
    assert_eq!(response.text, "bare");
    assert!(response.reasoning.is_none());
    assert!(response.tools.is_empty());
}

#[test]
fn str_conversions_build_text_responses() {
    let a: MockResponse = "hi".into();
    let b: MockResponse = String::from("hi").into();
    assert_eq!(a, b);
    assert_eq!(a.text, "hi");
}
