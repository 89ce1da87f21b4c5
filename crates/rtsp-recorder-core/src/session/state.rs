use crate::{
    CoreResult,
    capture::ActiveCapture,
    session::{SessionPhase, SessionStatus, StartedSession},
};

use chrono::{DateTime, Local, Utc};
use tokio::{sync::oneshot, time::Instant};
use uuid::Uuid;

/// The single session slot owned by the session manager.
pub(crate) enum SessionState {
    /// No capture process is starting or recording.
    Idle,
    /// Launched, waiting for the process to confirm startup.
    Starting {
        capture: ActiveCapture,
        reply: oneshot::Sender<CoreResult<StartedSession>>,
        deadline: Instant,
    },
    /// Confirmed and writing output.
    Recording {
        capture: ActiveCapture,
        started_at: DateTime<Local>,
    },
}

impl SessionState {
    pub(crate) fn phase(&self) -> SessionPhase {
        match self {
            Self::Idle => SessionPhase::Idle,
            Self::Starting { .. } => SessionPhase::Starting,
            Self::Recording { .. } => SessionPhase::Recording,
        }
    }

    pub(crate) fn session_id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Starting { capture, .. } | Self::Recording { capture, .. } => {
                Some(capture.session_id)
            }
        }
    }

    pub(crate) fn startup_deadline(&self) -> Option<Instant> {
        match self {
            Self::Starting { deadline, .. } => Some(*deadline),
            _ => None,
        }
    }

    pub(crate) fn status(&self, finalizing: bool) -> SessionStatus {
        match self {
            Self::Idle => SessionStatus::idle(finalizing),
            Self::Starting { capture, .. } => SessionStatus {
                recording: false,
                start_time: None,
                state: self.phase(),
                file: capture.file_name(),
                finalizing,
            },
            Self::Recording {
                capture,
                started_at,
            } => SessionStatus {
                recording: true,
                start_time: Some(started_at.with_timezone(&Utc)),
                state: self.phase(),
                file: capture.file_name(),
                finalizing,
            },
        }
    }
}

/// A stopped capture whose process has not reported its exit yet.
pub(crate) struct Finalizing {
    pub(crate) capture: ActiveCapture,
    pub(crate) deadline: Instant,
    pub(crate) killed: bool,
}
