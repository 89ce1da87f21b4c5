use crate::{
    CoreResult, RecorderError,
    session::{SessionCommand, SessionStatus, StartedSession, StoppedSession},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to the session manager.
///
/// Every method is a request/reply round trip to the manager task, so calls
/// from any number of HTTP handlers are applied one at a time.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { command_tx }
    }

    /// Start a capture and wait until the process confirms it is recording.
    ///
    /// # Errors
    ///
    /// `AlreadyRecording` if a capture is starting or recording, `Finalizing`
    /// if the previous capture has not exited yet, `SubprocessLaunch` if the
    /// process cannot start, `StartupTimeout` if it never confirms, and
    /// `StartAborted` if a stop arrives first.
    pub async fn start(&self) -> CoreResult<StartedSession> {
        self.request(|reply| SessionCommand::Start { reply }).await?
    }

    /// Interrupt the current capture. Returns without waiting for the process to exit.
    ///
    /// # Errors
    ///
    /// `NotRecording` if no capture is starting or recording.
    pub async fn stop(&self) -> CoreResult<StoppedSession> {
        self.request(|reply| SessionCommand::Stop { reply }).await?
    }

    /// Current session status. Has no side effects.
    pub async fn status(&self) -> CoreResult<SessionStatus> {
        self.request(|reply| SessionCommand::Status { reply }).await
    }

    /// Stop any capture, wait for it to finalize, and end the manager task.
    pub async fn shutdown(&self) -> CoreResult<()> {
        self.request(|reply| SessionCommand::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> CoreResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        if self.command_tx.send(command(reply_tx)).await.is_err() {
            return Err(unavailable());
        }

        reply_rx.await.map_err(|_| unavailable())
    }
}

#[track_caller]
fn unavailable() -> RecorderError {
    RecorderError::SessionUnavailable {
        location: ErrorLocation::from(Location::caller()),
    }
}
