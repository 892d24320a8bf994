// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Understudy
//!
//! A deterministic mock and record/replay engine for intercepted LLM
//! provider calls. Given a call description, the engine decides
//! synchronously whether to answer from a registered rule, replay a
//! previously captured response, hand the call to the real backend, or
//! fail. Dispatch is reproducible offline and safe to share across
//! threads.
//!
//! The host owns interception: however calls are diverted (a client
//! shim, a proxy, a test harness), the host builds a [`CallRequest`]
//! and asks the engine what to do. [`Engine::intercept`] is the
//! one-call form; [`Engine::dispatch`] plus
//! [`Engine::capture_response`] is the primitive pair for hosts that
//! need to drive the pass-through leg themselves.
//!
//! ```
//! use understudy::{CallRequest, Engine, MatchSpec, MockResponse};
//!
//! let engine = Engine::default();
//! engine
//!     .mock("gpt-4")
//!     .when(MatchSpec::contains("refund"))
//!     .respond("Refund issued.")?;
//!
//! let request = CallRequest::prompt("openai", "gpt-4", "please refund order 42");
//! let response = engine.intercept(&request, |_| MockResponse::empty())?;
//! assert_eq!(response.text, "Refund issued.");
//! # Ok::<(), understudy::Error>(())
//! ```

pub mod adapter;
pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod matcher;
pub mod request;
pub mod response;
pub mod rules;
pub mod sequence;
pub mod session;
pub mod trace;

/// Re-exported tape types from the understudy-replay crate.
pub mod replay {
    pub use understudy_replay::{
        canonical_json, fingerprint, SessionTape, TapeEntry, TapeError, TapeToolCall,
        TAPE_VERSION,
    };
}

pub use adapter::{AgentHandle, AgentReport, WrappedAgent};
pub use builder::MockBuilder;
pub use config::{ConfigError, EngineConfig};
pub use engine::{DispatchResult, Engine, PassThroughTicket};
pub use error::{Error, RuleError};
pub use fallback::FallbackPolicy;
pub use matcher::MatchSpec;
pub use request::CallRequest;
pub use response::{MockResponse, ToolCall};
pub use rules::{RuleId, RuleSpec};
pub use sequence::SequencePolicy;
pub use session::{SessionMode, SessionScope};
pub use trace::{TraceLog, TraceOutcome, TracedCall};
