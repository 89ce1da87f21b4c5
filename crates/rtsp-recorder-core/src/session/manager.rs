//! Recording session state machine.
//!
//! A single [`SessionManager`] task owns the session slot. HTTP handlers talk
//! to it through [`SessionHandle`] commands and capture processes report
//! through [`CaptureEvent`]s; both arrive over channels and are applied one at
//! a time, so transitions never interleave.
//!
//! ```text
//!            start               Started
//!   Idle ───────────▶ Starting ───────────▶ Recording
//!    ▲                   │                      │
//!    │   Failed/timeout  │                      │ Finished/Failed
//!    ├───────────────────┘                      │
//!    ├──────────────────────────────────────────┘
//!    │
//!    └── stop: process moves to the finalizing slot, state is Idle at once
//! ```
//!
//! A stopped process stays in the finalizing slot until it exits, and new
//! starts are rejected meanwhile, so at most one capture process is ever
//! alive.

use crate::{
    CoreResult, RecorderError,
    artifact::ArtifactNamer,
    capture::{
        ActiveCapture, CaptureEvent, CaptureEventKind, CaptureLauncher, LaunchSpec, RtspSource,
    },
    session::{
        Finalizing, SessionCommand, SessionHandle, SessionState, StartedSession, StoppedSession,
    },
};

use std::{panic::Location, time::Duration};

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Time allowed for a capture process to confirm startup.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Time allowed for an interrupted capture process to finalize before it is killed.
pub const DEFAULT_FINALIZE_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed for a killed process to report its exit before it is abandoned.
const KILL_GRACE: Duration = Duration::from_secs(2);

const CHANNEL_CAPACITY: usize = 32;

/// Settings the session manager needs to launch captures.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Stream to capture.
    pub source: RtspSource,
    /// Output path derivation.
    pub namer: ArtifactNamer,
    /// Bound on the wait for startup confirmation.
    pub startup_timeout: Duration,
    /// Bound on the wait for an interrupted process to exit.
    pub finalize_timeout: Duration,
}

/// Owner of the single recording session.
pub struct SessionManager {
    config: SessionConfig,
    launcher: Box<dyn CaptureLauncher>,
    state: SessionState,
    finalizing: Option<Finalizing>,
    command_rx: mpsc::Receiver<SessionCommand>,
    event_tx: mpsc::Sender<CaptureEvent>,
    event_rx: mpsc::Receiver<CaptureEvent>,
}

impl SessionManager {
    /// Spawn the manager task on the current tokio runtime.
    ///
    /// The task runs until [`SessionHandle::shutdown`] is called or every
    /// handle is dropped; either way an active capture is stopped and
    /// finalized before the task ends.
    pub fn spawn(
        config: SessionConfig,
        launcher: impl CaptureLauncher + 'static,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let manager = Self {
            config,
            launcher: Box::new(launcher),
            state: SessionState::Idle,
            finalizing: None,
            command_rx,
            event_tx,
            event_rx,
        };

        let task = tokio::spawn(manager.run());

        (SessionHandle::new(command_tx), task)
    }

    #[instrument(skip(self), fields(source = %self.config.source.redacted()))]
    async fn run(mut self) {
        info!(output_dir = ?self.config.namer.output_dir(), "Session manager started");

        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                // Events first: a reply must reflect every event already reported.
                biased;

                Some(event) = self.event_rx.recv() => self.handle_event(event),

                command = self.command_rx.recv() => match command {
                    Some(SessionCommand::Start { reply }) => self.start(reply),
                    Some(SessionCommand::Stop { reply }) => {
                        let _ = reply.send(self.stop());
                    }
                    Some(SessionCommand::Status { reply }) => {
                        let _ = reply.send(self.state.status(self.finalizing.is_some()));
                    }
                    Some(SessionCommand::Shutdown { reply }) => {
                        self.shutdown().await;
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        info!("All session handles dropped");
                        self.shutdown().await;
                        break;
                    }
                },

                _ = sleep_until(deadline) => self.handle_deadline(),
            }
        }

        info!("Session manager stopped");
    }

    fn start(&mut self, reply: oneshot::Sender<CoreResult<StartedSession>>) {
        if !matches!(self.state, SessionState::Idle) {
            warn!("Attempt to start recording while another is in progress");
            let _ = reply.send(Err(RecorderError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            }));
            return;
        }

        if let Some(finalizing) = &self.finalizing {
            warn!(
                session_id = %finalizing.capture.session_id,
                "Attempt to start recording while the previous one is finalizing"
            );
            let _ = reply.send(Err(RecorderError::Finalizing {
                location: ErrorLocation::from(Location::caller()),
            }));
            return;
        }

        let session_id = Uuid::new_v4();
        let spec = LaunchSpec {
            source: self.config.source.clone(),
            output_path: self.config.namer.path_for(&Local::now()),
        };

        match self
            .launcher
            .launch(session_id, &spec, self.event_tx.clone())
        {
            Ok(process) => {
                info!(
                    session_id = %session_id,
                    output = ?spec.output_path,
                    pid = ?process.pid(),
                    "Capture launched, waiting for confirmation"
                );
                self.state = SessionState::Starting {
                    capture: ActiveCapture {
                        session_id,
                        process,
                        output_path: spec.output_path,
                    },
                    reply,
                    deadline: Instant::now() + self.config.startup_timeout,
                };
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to launch capture process");
                let _ = reply.send(Err(e));
            }
        }
    }

    fn stop(&mut self) -> CoreResult<StoppedSession> {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => {
                warn!("Attempt to stop recording when no recording is in progress");
                Err(RecorderError::NotRecording {
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            SessionState::Starting { capture, reply, .. } => {
                info!(session_id = %capture.session_id, "Recording stopped before startup confirmed");
                let _ = reply.send(Err(RecorderError::StartAborted {
                    location: ErrorLocation::from(Location::caller()),
                }));
                Ok(self.begin_finalizing(capture, None))
            }
            SessionState::Recording {
                capture,
                started_at,
            } => {
                let duration = Local::now().signed_duration_since(started_at);
                info!(
                    session_id = %capture.session_id,
                    duration_ms = duration.num_milliseconds(),
                    "Recording stopped"
                );
                Ok(self.begin_finalizing(capture, Some(started_at)))
            }
        }
    }

    /// Interrupt `capture` and park it until its process exits.
    fn begin_finalizing(
        &mut self,
        mut capture: ActiveCapture,
        started_at: Option<DateTime<Local>>,
    ) -> StoppedSession {
        let mut killed = false;
        if let Err(e) = capture.process.interrupt() {
            warn!(session_id = %capture.session_id, error = %e, "Interrupt failed, killing capture process");
            capture.process.kill();
            killed = true;
        }

        let stopped = StoppedSession {
            session_id: capture.session_id,
            output_path: capture.output_path.clone(),
            started_at,
        };

        self.park(capture, killed);

        stopped
    }

    /// Only called with a capture taken out of `Starting` or `Recording`, and
    /// `start` never enters those while the slot is occupied.
    fn park(&mut self, capture: ActiveCapture, killed: bool) {
        debug_assert!(
            self.finalizing.is_none(),
            "finalizing slot already occupied"
        );

        let grace = if killed {
            KILL_GRACE
        } else {
            self.config.finalize_timeout
        };

        self.finalizing = Some(Finalizing {
            capture,
            deadline: Instant::now() + grace,
            killed,
        });
    }

    fn handle_event(&mut self, event: CaptureEvent) {
        let is_finalizing = self
            .finalizing
            .as_ref()
            .is_some_and(|f| f.capture.session_id == event.session_id);

        if is_finalizing {
            if event.kind.is_terminal() {
                if let Some(finalized) = self.finalizing.take() {
                    info!(
                        session_id = %event.session_id,
                        output = ?finalized.capture.output_path,
                        "Capture finalized"
                    );
                }
            }
            return;
        }

        if self.state.session_id() != Some(event.session_id) {
            debug!(session_id = %event.session_id, event = ?event.kind, "Ignoring event for unknown capture");
            return;
        }

        match (
            std::mem::replace(&mut self.state, SessionState::Idle),
            event.kind,
        ) {
            (
                SessionState::Starting { capture, reply, .. },
                CaptureEventKind::Started { at, detail },
            ) => {
                info!(session_id = %capture.session_id, detail = %detail, "Recording started");
                let started = StartedSession {
                    session_id: capture.session_id,
                    start_time: at,
                    output_path: capture.output_path.clone(),
                };
                if reply.send(Ok(started)).is_err() {
                    debug!(session_id = %capture.session_id, "Start requester went away");
                }
                self.state = SessionState::Recording {
                    capture,
                    started_at: at,
                };
            }
            (SessionState::Starting { capture, reply, .. }, CaptureEventKind::Failed { reason }) => {
                error!(
                    session_id = %capture.session_id,
                    reason = %reason,
                    "Capture process failed before recording started"
                );
                let _ = reply.send(Err(RecorderError::SubprocessLaunch {
                    reason,
                    location: ErrorLocation::from(Location::caller()),
                }));
            }
            (SessionState::Starting { capture, reply, .. }, CaptureEventKind::Finished) => {
                error!(
                    session_id = %capture.session_id,
                    "Capture process exited before recording started"
                );
                let _ = reply.send(Err(RecorderError::SubprocessLaunch {
                    reason: "capture process exited before recording started".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }));
            }
            (
                SessionState::Recording {
                    capture,
                    started_at,
                },
                CaptureEventKind::Finished,
            ) => {
                info!(
                    session_id = %capture.session_id,
                    started_at = %started_at,
                    output = ?capture.output_path,
                    "Recording finished"
                );
            }
            (SessionState::Recording { capture, .. }, CaptureEventKind::Failed { reason }) => {
                let err = RecorderError::SubprocessRuntime {
                    reason,
                    location: ErrorLocation::from(Location::caller()),
                };
                error!(
                    session_id = %capture.session_id,
                    output = ?capture.output_path,
                    error = %err,
                    "Recording failed"
                );
            }
            (
                SessionState::Recording {
                    capture,
                    started_at,
                },
                CaptureEventKind::Started { .. },
            ) => {
                debug!(session_id = %capture.session_id, "Duplicate start confirmation ignored");
                self.state = SessionState::Recording {
                    capture,
                    started_at,
                };
            }
            (SessionState::Idle, _) => {}
        }
    }

    fn handle_deadline(&mut self) {
        let now = Instant::now();

        if self.state.startup_deadline().is_some_and(|d| d <= now) {
            if let SessionState::Starting {
                mut capture, reply, ..
            } = std::mem::replace(&mut self.state, SessionState::Idle)
            {
                let timeout_secs = self.config.startup_timeout.as_secs();
                error!(
                    session_id = %capture.session_id,
                    timeout_secs,
                    "Capture process did not confirm startup in time"
                );
                capture.process.kill();
                let _ = reply.send(Err(RecorderError::StartupTimeout {
                    timeout_secs,
                    location: ErrorLocation::from(Location::caller()),
                }));
                self.park(capture, true);
            }
        }

        let expired = self.finalizing.as_ref().is_some_and(|f| f.deadline <= now);
        if !expired {
            return;
        }

        if let Some(mut finalizing) = self.finalizing.take() {
            if finalizing.killed {
                error!(
                    session_id = %finalizing.capture.session_id,
                    "Capture process did not exit after kill, abandoning it"
                );
            } else {
                warn!(
                    session_id = %finalizing.capture.session_id,
                    timeout_secs = self.config.finalize_timeout.as_secs(),
                    "Capture process did not finalize in time, killing it"
                );
                finalizing.capture.process.kill();
                finalizing.killed = true;
                finalizing.deadline = now + KILL_GRACE;
                self.finalizing = Some(finalizing);
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        let finalizing = self.finalizing.as_ref().map(|f| f.deadline);
        match (self.state.startup_deadline(), finalizing) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Stop any capture and wait until the finalizing slot is empty.
    async fn shutdown(&mut self) {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => {}
            SessionState::Starting { capture, reply, .. } => {
                let _ = reply.send(Err(RecorderError::StartAborted {
                    location: ErrorLocation::from(Location::caller()),
                }));
                self.begin_finalizing(capture, None);
            }
            SessionState::Recording {
                capture,
                started_at,
            } => {
                info!(session_id = %capture.session_id, "Stopping recording for shutdown");
                self.begin_finalizing(capture, Some(started_at));
            }
        }

        while self.finalizing.is_some() {
            let deadline = self.next_deadline();
            tokio::select! {
                biased;
                Some(event) = self.event_rx.recv() => self.handle_event(event),
                _ = sleep_until(deadline) => self.handle_deadline(),
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
