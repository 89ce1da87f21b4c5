//! RTSP Recorder Core Library
//!
//! Recording session management for a single `ffmpeg` capture process:
//! a state machine that allows at most one capture at a time, the process
//! adapter that reports capture lifecycle events, timestamp-based artifact
//! naming, and access to finished recordings.
//!
//! # Example
//!
//! ```no_run
//! use rtsp_recorder_core::{
//!     ArtifactNamer, CoreResult, FfmpegLauncher, RtspSource, SessionConfig, SessionManager,
//!     DEFAULT_FINALIZE_TIMEOUT, DEFAULT_STARTUP_TIMEOUT,
//! };
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let config = SessionConfig {
//!         source: RtspSource {
//!             user: "viewer".into(),
//!             password: "secret".into(),
//!             host: "192.168.1.20".into(),
//!             port: 554,
//!             path: "stream1".into(),
//!         },
//!         namer: ArtifactNamer::new("/srv/recordings", "mp4"),
//!         startup_timeout: DEFAULT_STARTUP_TIMEOUT,
//!         finalize_timeout: DEFAULT_FINALIZE_TIMEOUT,
//!     };
//!
//!     let (session, task) = SessionManager::spawn(config, FfmpegLauncher::default());
//!
//!     let started = session.start().await?;
//!     println!("Recording to {:?} since {}", started.output_path, started.start_time);
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     session.stop().await?;
//!
//!     session.shutdown().await?;
//!     let _ = task.await;
//!     Ok(())
//! }
//! ```

mod artifact;
mod capture;
mod error;
mod session;

pub use {
    artifact::{ArtifactFile, ArtifactNamer, ArtifactStore, DEFAULT_EXTENSION, FILE_STEM_FORMAT},
    capture::{
        CaptureEvent, CaptureEventKind, CaptureLauncher, CaptureProcess, DEFAULT_FFMPEG_PATH,
        DEFAULT_RTSP_PORT, FfmpegLauncher, LaunchSpec, RtspSource,
    },
    error::{RecorderError, Result as CoreResult},
    session::{
        DEFAULT_FINALIZE_TIMEOUT, DEFAULT_STARTUP_TIMEOUT, SessionConfig, SessionHandle,
        SessionManager, SessionPhase, SessionStatus, StartedSession, StoppedSession,
    },
};
