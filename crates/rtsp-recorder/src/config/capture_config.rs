use rtsp_recorder_core::{
    DEFAULT_EXTENSION, DEFAULT_FFMPEG_PATH, DEFAULT_FINALIZE_TIMEOUT, DEFAULT_STARTUP_TIMEOUT,
};

use std::path::PathBuf;

use serde::Deserialize;

/// Capture process settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// `ffmpeg` executable (`FFMPEG_PATH`).
    pub ffmpeg_path: PathBuf,
    /// Output container extension.
    pub extension: String,
    /// Seconds to wait for ffmpeg to confirm it is writing output.
    pub startup_timeout_secs: u64,
    /// Seconds to wait for an interrupted ffmpeg to finalize before killing it.
    pub finalize_timeout_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
            extension: DEFAULT_EXTENSION.to_string(),
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT.as_secs(),
            finalize_timeout_secs: DEFAULT_FINALIZE_TIMEOUT.as_secs(),
        }
    }
}
