// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine core: synchronous dispatch over rules, tape, and fallback.

use crate::adapter::{AgentHandle, WrappedAgent};
use crate::builder::MockBuilder;
use crate::config::EngineConfig;
use crate::error::Error;
use crate::fallback::FallbackPolicy;
use crate::request::CallRequest;
use crate::response::MockResponse;
use crate::rules::{RuleId, RuleSet, RuleSpec};
use crate::session::{RecordingSession, ReplaySession, SessionMode, SessionScope, SessionState};
use crate::trace::{TraceLog, TraceOutcome};
use parking_lot::Mutex;
use std::sync::Arc;
use understudy_replay::{fingerprint, SessionTape};

/// Outcome of a dispatch decision.
#[derive(Clone, Debug)]
pub enum DispatchResult {
    /// A registered rule matched; carries its next sequence element.
    Matched {
        rule: RuleId,
        response: MockResponse,
    },
    /// Served from the active replay tape.
    Replayed(MockResponse),
    /// No rule matched; policy `default` answered neutrally.
    FallbackDefault(MockResponse),
    /// No rule matched; policy `pass_through` defers to the real
    /// backend.
    PassThrough(PassThroughTicket),
}

impl DispatchResult {
    /// The engine-produced response, if this decision carries one.
    pub fn response(&self) -> Option<&MockResponse> {
        match self {
            DispatchResult::Matched { response, .. }
            | DispatchResult::Replayed(response)
            | DispatchResult::FallbackDefault(response) => Some(response),
            DispatchResult::PassThrough(_) => None,
        }
    }

    /// Consume the decision, keeping only its response.
    pub fn into_response(self) -> Option<MockResponse> {
        match self {
            DispatchResult::Matched { response, .. }
            | DispatchResult::Replayed(response)
            | DispatchResult::FallbackDefault(response) => Some(response),
            DispatchResult::PassThrough(_) => None,
        }
    }
}

/// Obligation attached to [`DispatchResult::PassThrough`].
///
/// The host invokes the real backend itself, then hands the result to
/// [`Engine::capture_response`] so an active recording can tape it
/// under the precomputed fingerprint.
#[derive(Clone, Debug)]
pub struct PassThroughTicket {
    pub(crate) provider: String,
    pub(crate) model: String,
    pub(crate) fingerprint: String,
    pub(crate) prompt: String,
}

impl PassThroughTicket {
    /// Fingerprint the captured response will be stored under.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

struct EngineState {
    config: EngineConfig,
    rules: RuleSet,
    session: SessionState,
    epoch: u64,
}

/// Deterministic dispatch engine.
///
/// Cheap to clone: clones share rules, configuration, session state,
/// and the trace log. All mutation is serialized behind one lock per
/// engine; the lock is never held across a real backend call.
#[derive(Clone)]
pub struct Engine {
    state: Arc<Mutex<EngineState>>,
    trace: TraceLog,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_trace_log(config, TraceLog::new())
    }

    /// Engine recording onto a caller-supplied trace log, typically one
    /// created with [`TraceLog::with_file`].
    pub fn with_trace_log(config: EngineConfig, trace: TraceLog) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState {
                config,
                rules: RuleSet::new(),
                session: SessionState::Idle,
                epoch: 0,
            })),
            trace,
        }
    }

    /// Start a fluent rule registration for `model`.
    ///
    /// The provider defaults to [`crate::request::infer_provider`] of
    /// the model name.
    pub fn mock(&self, model: impl Into<String>) -> MockBuilder {
        MockBuilder::new(self.clone(), model)
    }

    /// Validate and register a rule.
    pub fn register_rule(&self, spec: RuleSpec) -> Result<RuleId, Error> {
        let mut state = self.state.lock();
        let config = state.config.clone();
        Ok(state.rules.register(spec, &config)?)
    }

    /// Decide how to answer `request`.
    ///
    /// Replay mode consults only the tape; otherwise rules run
    /// newest-first and the fallback policy covers the rest. Exactly
    /// one trace record is appended per call.
    pub fn dispatch(&self, request: &CallRequest) -> Result<DispatchResult, Error> {
        let mut state = self.state.lock();
        let summary = request.summary();

        // replay mode: the tape is the only source of truth
        if let SessionState::Replaying(session) = &state.session {
            let fp = fingerprint(&request.provider, &request.model, &request.payload);
            return match session.tape.get(&fp) {
                Some(entry) => {
                    let response = MockResponse::from_tape_entry(entry);
                    self.trace.record(
                        &request.provider,
                        &request.model,
                        &summary,
                        TraceOutcome::Replayed {
                            session: session.name.clone(),
                            fingerprint: fp,
                            response: response.clone(),
                        },
                    );
                    Ok(DispatchResult::Replayed(response))
                }
                None => {
                    let err = Error::ReplayMiss {
                        session: session.name.clone(),
                        provider: request.provider.clone(),
                        model: request.model.clone(),
                        fingerprint: fp.clone(),
                        summary,
                    };
                    self.trace.record(
                        &request.provider,
                        &request.model,
                        request.summary(),
                        TraceOutcome::ReplayMiss {
                            fingerprint: fp,
                            message: err.to_string(),
                        },
                    );
                    Err(err)
                }
            };
        }

        if let Some((rule, response)) = state.rules.match_request(request) {
            // a recording tapes mocked hits too, so the session replays
            // a full run rather than only the pass-through calls
            if let SessionState::Recording(session) = &mut state.session {
                let fp = fingerprint(&request.provider, &request.model, &request.payload);
                session.tape.put(
                    fp,
                    response.to_tape_entry(&request.provider, &request.model, true),
                );
            }
            self.trace.record(
                &request.provider,
                &request.model,
                &summary,
                TraceOutcome::Matched {
                    rule,
                    response: response.clone(),
                },
            );
            return Ok(DispatchResult::Matched { rule, response });
        }

        match state.config.fallback {
            FallbackPolicy::Error => {
                let err = Error::NoMockMatch {
                    provider: request.provider.clone(),
                    model: request.model.clone(),
                    summary,
                };
                self.trace.record(
                    &request.provider,
                    &request.model,
                    request.summary(),
                    TraceOutcome::NoMatch {
                        message: err.to_string(),
                    },
                );
                Err(err)
            }
            FallbackPolicy::Default => {
                self.trace.record(
                    &request.provider,
                    &request.model,
                    &summary,
                    TraceOutcome::FallbackDefault,
                );
                Ok(DispatchResult::FallbackDefault(MockResponse::empty()))
            }
            FallbackPolicy::PassThrough => {
                let fp = fingerprint(&request.provider, &request.model, &request.payload);
                self.trace.record(
                    &request.provider,
                    &request.model,
                    &summary,
                    TraceOutcome::PassThrough {
                        fingerprint: fp.clone(),
                    },
                );
                Ok(DispatchResult::PassThrough(PassThroughTicket {
                    provider: request.provider.clone(),
                    model: request.model.clone(),
                    fingerprint: fp,
                    prompt: summary,
                }))
            }
        }
    }

    /// Feed a real backend response back after a pass-through.
    ///
    /// While a recording is active the response is taped under the
    /// ticket's fingerprint; otherwise this is a no-op.
    pub fn capture_response(&self, ticket: &PassThroughTicket, response: &MockResponse) {
        let mut state = self.state.lock();
        if let SessionState::Recording(session) = &mut state.session {
            session.tape.put(
                ticket.fingerprint.clone(),
                response.to_tape_entry(&ticket.provider, &ticket.model, false),
            );
            self.trace.record(
                &ticket.provider,
                &ticket.model,
                &ticket.prompt,
                TraceOutcome::Captured {
                    fingerprint: ticket.fingerprint.clone(),
                    response: response.clone(),
                },
            );
        }
    }

    /// Dispatch and resolve in one call.
    ///
    /// `invoke_real` runs only on pass-through, with no engine lock
    /// held, and its response is captured when a recording is active.
    pub fn intercept<F>(&self, request: &CallRequest, invoke_real: F) -> Result<MockResponse, Error>
    where
        F: FnOnce(&CallRequest) -> MockResponse,
    {
        match self.dispatch(request)? {
            DispatchResult::Matched { response, .. }
            | DispatchResult::Replayed(response)
            | DispatchResult::FallbackDefault(response) => Ok(response),
            DispatchResult::PassThrough(ticket) => {
                let response = invoke_real(request);
                self.capture_response(&ticket, &response);
                Ok(response)
            }
        }
    }

    /// Begin recording under `name`, finalizing any active session
    /// first.
    ///
    /// The effective fallback becomes `pass_through` until the
    /// recording finalizes; finalizing writes
    /// `<sessions_dir>/<name>.json`, overwriting any previous tape of
    /// that name.
    pub fn record(&self, name: &str) -> Result<(), Error> {
        let mut state = self.state.lock();
        Self::start_recording_locked(&mut state, name)
    }

    /// [`Engine::record`] returning a scope guard that finalizes on
    /// drop.
    pub fn record_scope(&self, name: &str) -> Result<SessionScope, Error> {
        let epoch = {
            let mut state = self.state.lock();
            Self::start_recording_locked(&mut state, name)?;
            state.epoch
        };
        Ok(SessionScope::new(
            self.clone(),
            SessionMode::Recording(name.to_string()),
            epoch,
        ))
    }

    /// Begin replaying the named tape, finalizing any active session
    /// first.
    ///
    /// Fails with `SessionNotFound` when no tape exists for `name` and
    /// `SessionCorrupted` when the file does not parse.
    pub fn replay(&self, name: &str) -> Result<(), Error> {
        let mut state = self.state.lock();
        Self::start_replay_locked(&mut state, name)
    }

    /// [`Engine::replay`] returning a scope guard that finalizes on
    /// drop.
    pub fn replay_scope(&self, name: &str) -> Result<SessionScope, Error> {
        let epoch = {
            let mut state = self.state.lock();
            Self::start_replay_locked(&mut state, name)?;
            state.epoch
        };
        Ok(SessionScope::new(
            self.clone(),
            SessionMode::Replaying(name.to_string()),
            epoch,
        ))
    }

    /// Finalize the active session, if any.
    ///
    /// A recording flushes its tape to disk and restores the configured
    /// fallback; a replay discards its tape. Idle is a no-op.
    pub fn stop_session(&self) -> Result<(), Error> {
        let mut state = self.state.lock();
        Self::finalize_locked(&mut state)
    }

    /// Finalize any active session, then clear rules and the trace.
    ///
    /// Rules and the trace are cleared even when the flush fails; the
    /// error is returned so a lost tape does not go unnoticed.
    pub fn reset(&self) -> Result<(), Error> {
        let mut state = self.state.lock();
        let flushed = Self::finalize_locked(&mut state);
        state.rules.clear();
        self.trace.clear();
        flushed
    }

    /// Current lifecycle state.
    pub fn session_mode(&self) -> SessionMode {
        self.state.lock().session.mode()
    }

    /// Snapshot of the current configuration.
    ///
    /// Reflects the forced `pass_through` fallback while a recording is
    /// active.
    pub fn config(&self) -> EngineConfig {
        self.state.lock().config.clone()
    }

    /// Replace the fallback policy.
    ///
    /// During a recording the new policy takes effect when the session
    /// finalizes; the recording itself keeps passing through.
    pub fn set_fallback(&self, fallback: FallbackPolicy) {
        let mut state = self.state.lock();
        match &mut state.session {
            SessionState::Recording(session) => session.prior_fallback = fallback,
            _ => state.config.fallback = fallback,
        }
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.state.lock().rules.len()
    }

    /// Handle to the shared trace log.
    pub fn trace(&self) -> TraceLog {
        self.trace.clone()
    }

    /// Wrap a host agent for transparent interception.
    pub fn wrap(&self, handle: AgentHandle) -> WrappedAgent {
        WrappedAgent::new(self.clone(), handle)
    }

    /// Finalize only if `epoch` still identifies the active session.
    pub(crate) fn finalize_epoch(&self, epoch: u64) -> Result<(), Error> {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            // a newer session owns the engine now
            return Ok(());
        }
        Self::finalize_locked(&mut state)
    }

    fn start_recording_locked(state: &mut EngineState, name: &str) -> Result<(), Error> {
        Self::finalize_locked(state)?;
        let prior_fallback = state.config.fallback;
        state.config.fallback = FallbackPolicy::PassThrough;
        state.session = SessionState::Recording(RecordingSession {
            name: name.to_string(),
            tape: SessionTape::new(),
            prior_fallback,
        });
        state.epoch += 1;
        Ok(())
    }

    fn start_replay_locked(state: &mut EngineState, name: &str) -> Result<(), Error> {
        Self::finalize_locked(state)?;
        let tape = SessionTape::open(&state.config.sessions_dir, name)?;
        state.session = SessionState::Replaying(ReplaySession {
            name: name.to_string(),
            tape,
        });
        state.epoch += 1;
        Ok(())
    }

    /// Leaves the engine idle even when the flush fails.
    fn finalize_locked(state: &mut EngineState) -> Result<(), Error> {
        match std::mem::replace(&mut state.session, SessionState::Idle) {
            SessionState::Idle => Ok(()),
            SessionState::Replaying(_) => Ok(()),
            SessionState::Recording(session) => {
                state.config.fallback = session.prior_fallback;
                let path = SessionTape::path_for(&state.config.sessions_dir, &session.name);
                session.tape.save(&path)?;
                Ok(())
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Engine")
            .field("rules", &state.rules.len())
            .field("session", &state.session.mode())
            .field("fallback", &state.config.fallback)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
