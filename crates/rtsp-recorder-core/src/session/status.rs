use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Coarse session state reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No capture process is starting or recording.
    Idle,
    /// A capture process was launched and has not confirmed startup yet.
    Starting,
    /// A capture process is writing output.
    Recording,
}

/// Point-in-time view of the recording session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// True only while a confirmed capture is running.
    pub recording: bool,
    /// When the running capture confirmed startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Current session phase.
    pub state: SessionPhase,
    /// Artifact file being written, while starting or recording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// A stopped capture process has not exited yet.
    pub finalizing: bool,
}

impl SessionStatus {
    pub(crate) fn idle(finalizing: bool) -> Self {
        Self {
            recording: false,
            start_time: None,
            state: SessionPhase::Idle,
            file: None,
            finalizing,
        }
    }
}

/// Result of a successful start.
#[derive(Debug, Clone)]
pub struct StartedSession {
    /// Session id used for log correlation.
    pub session_id: Uuid,
    /// When the capture process confirmed startup.
    pub start_time: DateTime<Local>,
    /// Artifact being written.
    pub output_path: PathBuf,
}

/// Result of a successful stop.
#[derive(Debug, Clone)]
pub struct StoppedSession {
    /// Session id used for log correlation.
    pub session_id: Uuid,
    /// Artifact the stopped capture was writing.
    pub output_path: PathBuf,
    /// When the capture confirmed startup, if it got that far.
    pub started_at: Option<DateTime<Local>>,
}
