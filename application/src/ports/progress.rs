//! Progress notification port
//!
//! Use cases publish [`ProgressEvent`]s into a channel; the presentation
//! layer drains the receiver and renders them. Publishing never blocks and
//! is safe from concurrently running invocations.

use tokio::sync::mpsc;

/// Status of one unit of work (a model call, a stage or a whole scenario)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Running,
    Completed,
    Failed,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::Running => "running",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Failed => "failed",
        }
    }
}

/// Phase of a scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Execution,
    Aggregation,
    Error,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Execution => "execution",
            Stage::Aggregation => "aggregation",
            Stage::Error => "error",
        }
    }
}

/// Events emitted while a run is in flight
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Per-model status; `step` is 1-based
    Model {
        step: usize,
        total: usize,
        role: String,
        status: ProgressStatus,
        error: Option<String>,
    },
    /// A phase of a scenario run starting, finishing or failing
    Stage {
        stage: Stage,
        status: ProgressStatus,
        message: String,
    },
    /// Per-scenario status in a batch run; `index` is 1-based
    Scenario {
        index: usize,
        total: usize,
        name: String,
        status: ProgressStatus,
        error: Option<String>,
    },
}

/// Receiving half handed to the presentation layer
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Sending half shared by use cases
///
/// A disabled sender drops every event; a closed receiver is ignored.
#[derive(Debug, Clone, Default)]
pub struct ProgressSender {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressSender {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Sender that discards everything
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn model(
        &self,
        step: usize,
        total: usize,
        role: &str,
        status: ProgressStatus,
        error: Option<String>,
    ) {
        self.send(ProgressEvent::Model {
            step,
            total,
            role: role.to_string(),
            status,
            error,
        });
    }

    pub fn stage(&self, stage: Stage, status: ProgressStatus, message: impl Into<String>) {
        self.send(ProgressEvent::Stage {
            stage,
            status,
            message: message.into(),
        });
    }

    pub fn scenario(
        &self,
        index: usize,
        total: usize,
        name: &str,
        status: ProgressStatus,
        error: Option<String>,
    ) {
        self.send(ProgressEvent::Scenario {
            index,
            total,
            name: name.to_string(),
            status,
            error,
        });
    }
}

/// Create a connected sender/receiver pair
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender::new(tx), rx)
}
