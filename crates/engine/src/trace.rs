// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch trace for test assertions.
//!
//! Every dispatch decision is appended to an in-memory log, optionally
//! streamed to a JSONL file. Tests read the log to assert what the
//! engine saw and how it answered; the engine itself never reads it
//! back.

use crate::response::MockResponse;
use crate::rules::RuleId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// One traced dispatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TracedCall {
    /// Sequence number, starting at zero.
    pub seq: u64,

    /// Wall-clock timestamp.
    pub timestamp: SystemTime,

    /// Elapsed time since the log was created.
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,

    /// Provider of the dispatched request.
    pub provider: String,

    /// Model of the dispatched request.
    pub model: String,

    /// Truncated primary text of the request.
    pub prompt: String,

    /// How the engine answered.
    pub outcome: TraceOutcome,
}

/// Outcome of one traced dispatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceOutcome {
    /// A registered rule answered.
    Matched {
        rule: RuleId,
        response: MockResponse,
    },
    /// Served from the active replay tape.
    Replayed {
        session: String,
        fingerprint: String,
        response: MockResponse,
    },
    /// Neutral response from the `default` fallback.
    FallbackDefault,
    /// Handed to the real backend.
    PassThrough { fingerprint: String },
    /// Real response captured onto the active recording.
    Captured {
        fingerprint: String,
        response: MockResponse,
    },
    /// Fallback `error` with no rule hit.
    NoMatch { message: String },
    /// Active replay session had no entry for the fingerprint.
    ReplayMiss {
        fingerprint: String,
        message: String,
    },
}

impl TraceOutcome {
    /// The response this outcome carried, if the engine produced one.
    pub fn response(&self) -> Option<&MockResponse> {
        match self {
            TraceOutcome::Matched { response, .. }
            | TraceOutcome::Replayed { response, .. }
            | TraceOutcome::Captured { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Append-only log of dispatch decisions.
///
/// Clones share the same buffer, so a host can keep one handle while
/// the engine records through another.
pub struct TraceLog {
    start: Instant,
    calls: Arc<Mutex<Vec<TracedCall>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl TraceLog {
    /// In-memory log.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            calls: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Log that also appends each record to `path` as JSONL.
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            calls: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Append one record, assigning its sequence number.
    pub fn record(
        &self,
        provider: impl Into<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
        outcome: TraceOutcome,
    ) -> u64 {
        let mut calls = self.calls.lock();
        let seq = calls.len() as u64;
        let call = TracedCall {
            seq,
            timestamp: SystemTime::now(),
            elapsed: self.start.elapsed(),
            provider: provider.into(),
            model: model.into(),
            prompt: prompt.into(),
            outcome,
        };

        calls.push(call.clone());

        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&call) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }

        seq
    }

    /// All records so far.
    pub fn calls(&self) -> Vec<TracedCall> {
        self.calls.lock().clone()
    }

    /// The last `n` records, oldest first.
    pub fn last(&self, n: usize) -> Vec<TracedCall> {
        let calls = self.calls.lock();
        calls.iter().rev().take(n).rev().cloned().collect()
    }

    /// Records from sequence number `seq` onward.
    pub fn since(&self, seq: u64) -> Vec<TracedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.seq >= seq)
            .cloned()
            .collect()
    }

    /// Count records matching a predicate.
    pub fn count<F: Fn(&TracedCall) -> bool>(&self, pred: F) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    /// Records whose prompt contains `pattern`.
    pub fn find_by_prompt(&self, pattern: &str) -> Vec<TracedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.prompt.contains(pattern))
            .cloned()
            .collect()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Drop all records.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Default for TraceLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TraceLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            calls: Arc::clone(&self.calls),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

impl std::fmt::Debug for TraceLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLog")
            .field("len", &self.len())
            .field("to_file", &self.file_writer.is_some())
            .finish()
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct DurationDef {
        secs: u64,
        nanos: u32,
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DurationDef {
            secs: duration.as_secs(),
            nanos: duration.subsec_nanos(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let def = DurationDef::deserialize(deserializer)?;
        Ok(Duration::new(def.secs, def.nanos))
    }
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod tests;
