mod command;
mod handle;
mod manager;
mod state;
mod status;

pub(crate) use {command::SessionCommand, state::{Finalizing, SessionState}};

pub use {
    handle::SessionHandle,
    manager::{
        DEFAULT_FINALIZE_TIMEOUT, DEFAULT_STARTUP_TIMEOUT, SessionConfig, SessionManager,
    },
    status::{SessionPhase, SessionStatus, StartedSession, StoppedSession},
};
