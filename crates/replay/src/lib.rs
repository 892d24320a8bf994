// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical fingerprinting and session tapes for understudy.
//!
//! This crate is the durable half of record/replay: a deterministic,
//! key-order-independent fingerprint for intercepted requests, and a
//! per-session tape file mapping fingerprints to captured responses.
//! The engine crate decides *when* to record or replay; this crate only
//! knows how to hash a request and how to read and write a tape.

mod fingerprint;
mod tape;

pub use fingerprint::{canonical_json, fingerprint};
pub use tape::{SessionTape, TapeEntry, TapeError, TapeToolCall, TAPE_VERSION};
