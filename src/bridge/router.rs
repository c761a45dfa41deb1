//! Call router — gates on backend lifecycle, dispatches by method name.

use crate::backend::ReportingBackend;
use crate::bridge::translator;
use crate::report::FatalHandoff;
use crate::types::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of dispatching a call.
///
/// Successes in this protocol never carry a value; "not implemented" is a
/// distinct outcome so callers can tell a missing capability apart from a
/// call that ran and did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call ran (or was deliberately ignored); no result value.
    Success,
    /// The method name is not part of the bridge surface.
    NotImplemented,
}

/// One-shot backend startup gate.
///
/// The transition is monotonic: once started, never back. Calls racing with
/// `initialize` may observe either state; pre-start behavior is a safe no-op,
/// so the race stays harmless.
#[derive(Debug, Default)]
pub struct StartupGate {
    started: AtomicBool,
}

impl StartupGate {
    pub fn mark_started(&self) {
        self.started.store(true, Ordering::Release);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

/// The bridge between application-layer method calls and the reporting
/// backend. Holds no per-call state; `dispatch` takes `&self` and may be
/// called from any number of connections concurrently.
#[derive(Clone)]
pub struct Bridge {
    backend: Arc<dyn ReportingBackend>,
    handoff: Arc<dyn FatalHandoff>,
    gate: Arc<StartupGate>,
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("started", &self.gate.is_started())
            .finish_non_exhaustive()
    }
}

impl Bridge {
    pub fn new(backend: Arc<dyn ReportingBackend>, handoff: Arc<dyn FatalHandoff>) -> Self {
        Self {
            backend,
            handoff,
            gate: Arc::new(StartupGate::default()),
        }
    }

    /// Route one named call to the backend.
    ///
    /// `initialize` always succeeds and opens the gate. While the gate is
    /// closed every other call, known or not, succeeds without touching
    /// the backend: clients that opted out of reporting must never observe
    /// errors from reporting calls.
    pub fn dispatch(&self, method: &str, payload: &Value) -> Result<Outcome> {
        if method == "initialize" {
            self.backend.start();
            self.gate.mark_started();
            tracing::info!("reporting backend initialized");
            return Ok(Outcome::Success);
        }

        if !self.gate.is_started() {
            tracing::debug!(method, "backend not initialized, call ignored");
            return Ok(Outcome::Success);
        }

        match method {
            "logEvent" => translator::log_event(self.backend.as_ref(), payload),
            "log" => translator::log(self.backend.as_ref(), payload),
            "setInfo" => translator::set_info(self.backend.as_ref(), payload),
            "setUserInfo" => translator::set_user_info(self.backend.as_ref(), payload),
            "reportCrash" => {
                translator::report_crash(self.backend.as_ref(), self.handoff.as_ref(), payload)
            }
            _ => Ok(Outcome::NotImplemented),
        }
    }
}

// =============================================================================
// Shared helpers — used by the translator
// =============================================================================

pub(crate) fn str_field(body: &Value, key: &str) -> Result<String> {
    body.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::validation(format!("Missing required field: {}", key)))
}
