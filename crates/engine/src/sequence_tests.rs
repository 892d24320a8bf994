// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn clamp_repeats_the_final_element() {
    let mut cursor = SequenceCursor::new(3, SequencePolicy::Clamp);
    let selected: Vec<usize> = (0..5).map(|_| cursor.advance()).collect();
    assert_eq!(selected, vec![0, 1, 2, 2, 2]);
}

#[test]
fn cycle_wraps_to_the_start() {
    let mut cursor = SequenceCursor::new(3, SequencePolicy::Cycle);
    let selected: Vec<usize> = (0..7).map(|_| cursor.advance()).collect();
    assert_eq!(selected, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn single_element_always_selects_zero() {
    let mut clamp = SequenceCursor::new(1, SequencePolicy::Clamp);
    let mut cycle = SequenceCursor::new(1, SequencePolicy::Cycle);
    for _ in 0..4 {
        assert_eq!(clamp.advance(), 0);
        assert_eq!(cycle.advance(), 0);
    }
}

#[test]
fn peek_does_not_advance() {
    let mut cursor = SequenceCursor::new(2, SequencePolicy::Clamp);
    assert_eq!(cursor.peek(), 0);
    assert_eq!(cursor.peek(), 0);
    assert_eq!(cursor.advance(), 0);
    assert_eq!(cursor.peek(), 1);
    assert_eq!(cursor.calls(), 1);
}

#[test]
fn calls_counts_past_the_end() {
    let mut cursor = SequenceCursor::new(2, SequencePolicy::Clamp);
    for _ in 0..5 {
        cursor.advance();
    }
    assert_eq!(cursor.calls(), 5);
    assert_eq!(cursor.len(), 2);
    assert!(!cursor.is_empty());
}

#[test]
fn policy_serde_names_are_snake_case() {
    assert_eq!(serde_json::to_string(&SequencePolicy::Clamp).unwrap(), r#""clamp""#);
    assert_eq!(serde_json::to_string(&SequencePolicy::Cycle).unwrap(), r#""cycle""#);
    let parsed: SequencePolicy = serde_json::from_str(r#""cycle""#).unwrap();
    assert_eq!(parsed, SequencePolicy::Cycle);
}
