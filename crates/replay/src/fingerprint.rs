// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic request fingerprinting.
//!
//! Two structurally equal requests must hash identically no matter how
//! their payload keys are ordered, across processes and runs. The
//! fingerprint is the sole key into a session tape, so any instability
//! here breaks replay. Volatile payload fields (timestamps, random ids)
//! are the caller's responsibility to exclude before dispatch.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Compute the canonical fingerprint for an intercepted call.
///
/// The triple is wrapped as `{"model", "provider", "request"}`, rendered
/// as JSON with recursively sorted object keys, and hashed with SHA-256.
/// Returns the lowercase hex digest.
pub fn fingerprint(provider: &str, model: &str, payload: &Value) -> String {
    let canonical = canonical_json(provider, model, payload);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonical JSON form of the (provider, model, payload) triple.
///
/// Exposed separately so tests and diagnostics can inspect exactly what
/// was hashed.
pub fn canonical_json(provider: &str, model: &str, payload: &Value) -> String {
    let mut wrapper = Map::with_capacity(3);
    wrapper.insert("model".to_string(), Value::String(model.to_string()));
    wrapper.insert("provider".to_string(), Value::String(provider.to_string()));
    wrapper.insert("request".to_string(), sorted(payload));
    Value::Object(wrapper).to_string()
}

/// Rebuild `value` with every object's keys in ascending order.
///
/// Keys are inserted sorted, which keeps the output stable regardless of
/// which map backend serde_json was built with.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::with_capacity(map.len());
            for key in keys {
                if let Some(inner) = map.get(key) {
                    out.insert(key.clone(), sorted(inner));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
