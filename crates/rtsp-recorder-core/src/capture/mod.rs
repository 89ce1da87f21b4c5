mod event;
mod ffmpeg;
mod launcher;
mod source;
mod stderr_lines;

pub(crate) use {launcher::ActiveCapture, stderr_lines::StderrLines};

pub use {
    event::{CaptureEvent, CaptureEventKind},
    ffmpeg::{DEFAULT_FFMPEG_PATH, FfmpegLauncher},
    launcher::{CaptureLauncher, CaptureProcess, LaunchSpec},
    source::{DEFAULT_RTSP_PORT, RtspSource},
};

#[cfg(test)]
pub(crate) use {
    ffmpeg::{is_started_line, summarize_tail},
    stderr_lines::MAX_LINE_BYTES,
};
