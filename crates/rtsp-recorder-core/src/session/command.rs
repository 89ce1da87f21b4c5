use crate::{
    CoreResult,
    session::{SessionStatus, StartedSession, StoppedSession},
};

use tokio::sync::oneshot;

/// Requests sent from [`SessionHandle`](crate::SessionHandle)s to the session manager.
pub(crate) enum SessionCommand {
    /// Start a new capture. Answered once the capture confirms or fails.
    Start {
        reply: oneshot::Sender<CoreResult<StartedSession>>,
    },
    /// Interrupt the current capture. Answered immediately.
    Stop {
        reply: oneshot::Sender<CoreResult<StoppedSession>>,
    },
    /// Snapshot the session state.
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
    /// Stop any capture, wait for it to finalize, then exit the manager.
    Shutdown { reply: oneshot::Sender<()> },
}
