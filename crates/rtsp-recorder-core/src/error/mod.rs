use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session and artifact errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// A capture session is already starting or recording.
    #[error("Recording already in progress {location}")]
    AlreadyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stop requested while no capture session exists.
    #[error("No recording in progress {location}")]
    NotRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The previously stopped capture process has not exited yet.
    #[error("Previous recording is still finalizing {location}")]
    Finalizing {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture command could not be started, or failed before confirming.
    #[error("Capture process failed to start: {reason} {location}")]
    SubprocessLaunch {
        /// Description of the launch failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture command exited abnormally mid-session.
    #[error("Capture process failed: {reason} {location}")]
    SubprocessRuntime {
        /// Description of the runtime failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture command did not confirm startup in time.
    #[error("Capture process did not start within {timeout_secs}s {location}")]
    StartupTimeout {
        /// Configured startup timeout in seconds.
        timeout_secs: u64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A stop request arrived before the capture process confirmed startup.
    #[error("Recording start aborted by stop request {location}")]
    StartAborted {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The session manager task is no longer running.
    #[error("Session manager unavailable {location}")]
    SessionUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Artifact directory or file operation failed.
    #[error("Storage error: {reason}: {source} {location}")]
    Storage {
        /// What was being attempted.
        reason: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Artifact name would escape the output directory or is otherwise unusable.
    #[error("Invalid recording name: {name:?} {location}")]
    InvalidArtifactName {
        /// The rejected name.
        name: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
