use chrono::{DateTime, Local};
use uuid::Uuid;

/// Lifecycle notification emitted by a capture process supervisor.
///
/// A single capture emits at most one `Started` followed by exactly one
/// terminal event (`Finished` or `Failed`), in that order.
#[derive(Debug, Clone)]
pub struct CaptureEvent {
    /// Session the capture process belongs to.
    pub session_id: Uuid,
    /// What happened.
    pub kind: CaptureEventKind,
}

/// Kinds of capture lifecycle events.
#[derive(Debug, Clone)]
pub enum CaptureEventKind {
    /// The process confirmed it is writing output.
    Started {
        /// When the confirmation was observed.
        at: DateTime<Local>,
        /// Confirmation line reported by the process.
        detail: String,
    },
    /// The process exited cleanly.
    Finished,
    /// The process exited abnormally or could not be observed.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

impl CaptureEventKind {
    /// Whether this event ends the capture.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }
}
