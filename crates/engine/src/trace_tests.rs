// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

fn no_match(text: &str) -> TraceOutcome {
    TraceOutcome::NoMatch {
        message: text.to_string(),
    }
}

#[test]
fn records_are_numbered_in_order() {
    let log = TraceLog::new();
    assert_eq!(log.record("openai", "gpt-4", "one", no_match("a")), 0);
    assert_eq!(log.record("openai", "gpt-4", "two", no_match("b")), 1);

    let calls = log.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].seq, 0);
    assert_eq!(calls[0].prompt, "one");
    assert_eq!(calls[1].seq, 1);
}

#[test]
fn clones_share_the_buffer() {
    let log = TraceLog::new();
    let handle = log.clone();
    log.record("openai", "gpt-4", "via original", no_match("x"));

    assert_eq!(handle.len(), 1);
    handle.clear();
    assert!(log.is_empty());
}

#[test]
fn last_returns_newest_in_original_order() {
    let log = TraceLog::new();
    for i in 0..5 {
        log.record("openai", "gpt-4", format!("p{i}"), no_match("x"));
    }

    let tail = log.last(2);
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].prompt, "p3");
    assert_eq!(tail[1].prompt, "p4");
}

#[test]
fn since_filters_by_sequence_number() {
    let log = TraceLog::new();
    for i in 0..4 {
        log.record("openai", "gpt-4", format!("p{i}"), no_match("x"));
    }

    let newer = log.since(2);
    assert_eq!(newer.len(), 2);
    assert_eq!(newer[0].seq, 2);
}

#[test]
fn count_and_find_by_prompt() {
    let log = TraceLog::new();
    log.record("openai", "gpt-4", "refund order", no_match("x"));
    log.record("openai", "gpt-4", "weather today", no_match("x"));
    log.record("openai", "gpt-4", "refund again", no_match("x"));

    assert_eq!(log.count(|c| c.prompt.contains("refund")), 2);
    assert_eq!(log.find_by_prompt("weather").len(), 1);
}

#[test]
fn file_sink_writes_one_json_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");

    let log = TraceLog::with_file(&path).unwrap();
    log.record("openai", "gpt-4", "hello", no_match("no rule"));
    log.record(
        "anthropic",
        "claude-3",
        "hi",
        TraceOutcome::FallbackDefault,
    );

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: TracedCall = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.seq, 0);
    assert_eq!(first.provider, "openai");
    assert!(matches!(first.outcome, TraceOutcome::NoMatch { .. }));
}

#[test]
fn outcome_response_accessor() {
    let response = MockResponse::text("yes");
    let outcome = TraceOutcome::Matched {
        rule: rule_id_for_test(),
        response: response.clone(),
    };
    assert_eq!(outcome.response(), Some(&response));
    assert!(TraceOutcome::FallbackDefault.response().is_none());
}

#[test]
fn serialized_outcome_is_tagged_snake_case() {
    let json = serde_json::to_string(&TraceOutcome::PassThrough {
        fingerprint: "abc".to_string(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"pass_through""#));
}

fn rule_id_for_test() -> RuleId {
    serde_json::from_str("3").unwrap()
}
