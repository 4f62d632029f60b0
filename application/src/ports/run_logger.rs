//! Port for structured run logging.
//!
//! Defines the [`RunLogger`] trait for recording what happened during a MOA
//! run (per-model results, aggregation outcome, run completion) to a
//! machine-readable transcript, separate from `tracing` diagnostics.

use serde_json::Value;

/// A structured run event for logging.
pub struct RunEvent {
    /// Event type identifier (e.g., "invocation_result", "run_completed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data. Never contains credentials.
    pub payload: Value,
}

impl RunEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging run events.
///
/// `log` is synchronous and infallible; write failures are the adapter's
/// problem and never abort a run.
pub trait RunLogger: Send + Sync {
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoRunLogger;

impl RunLogger for NoRunLogger {
    fn log(&self, _event: RunEvent) {}
}
