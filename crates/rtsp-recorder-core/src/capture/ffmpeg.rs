//! `ffmpeg` capture process adapter.
//!
//! Spawns one `ffmpeg` process per session that stream-copies the RTSP source
//! into the output container, and a supervisor task that turns the process's
//! stderr and exit status into [`CaptureEvent`]s.

use crate::{
    CoreResult, RecorderError,
    capture::{
        CaptureEvent, CaptureEventKind, CaptureLauncher, CaptureProcess, LaunchSpec,
        StderrLines,
    },
};

use std::{
    collections::VecDeque,
    ffi::OsString,
    panic::Location,
    path::PathBuf,
    process::Stdio,
};

use chrono::Local;
use error_location::ErrorLocation;
use tokio::{
    io::AsyncReadExt,
    process::{Child, ChildStderr, Command},
    sync::{mpsc, oneshot},
};
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

/// Program name used when no explicit `ffmpeg` path is configured.
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// ffmpeg prints `Output #0, mp4, to '...'` once input and output are open.
const STARTED_MARKER: &str = "Output #";

/// Number of stderr lines kept for failure reports.
pub(crate) const STDERR_TAIL_LINES: usize = 8;

const STDERR_CHUNK_BYTES: usize = 4096;

/// Launches `ffmpeg` in stream-copy mode.
#[derive(Debug, Clone)]
pub struct FfmpegLauncher {
    program: PathBuf,
    rtsp_transport: Option<String>,
}

impl FfmpegLauncher {
    /// Create a launcher for the given `ffmpeg` executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            rtsp_transport: None,
        }
    }

    /// Force a specific RTSP lower transport (`tcp` or `udp`).
    pub fn with_rtsp_transport(mut self, transport: Option<String>) -> Self {
        self.rtsp_transport = transport.filter(|t| !t.is_empty());
        self
    }

    /// Command line arguments for one capture. Audio and video are copied, never re-encoded.
    pub fn args(&self, spec: &LaunchSpec) -> Vec<OsString> {
        let mut args: Vec<OsString> =
            vec!["-hide_banner".into(), "-nostdin".into(), "-nostats".into()];

        if let Some(transport) = &self.rtsp_transport {
            args.push("-rtsp_transport".into());
            args.push(transport.into());
        }

        args.push("-i".into());
        args.push(spec.source.url().into());
        args.extend(["-c:v", "copy", "-c:a", "copy", "-y"].map(OsString::from));
        args.push(spec.output_path.clone().into_os_string());

        args
    }
}

impl Default for FfmpegLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_PATH)
    }
}

impl CaptureLauncher for FfmpegLauncher {
    #[track_caller]
    #[instrument(skip(self, events), fields(output = ?spec.output_path))]
    fn launch(
        &self,
        session_id: Uuid,
        spec: &LaunchSpec,
        events: mpsc::Sender<CaptureEvent>,
    ) -> CoreResult<Box<dyn CaptureProcess>> {
        let mut command = Command::new(&self.program);
        command
            .args(self.args(spec))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Own process group: a Ctrl-C on the service terminal must not reach
        // ffmpeg before the session manager interrupts it.
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| RecorderError::SubprocessLaunch {
            reason: format!("Failed to spawn {}: {}", self.program.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let pid = child.id();
        let stderr = child.stderr.take();
        let (kill_tx, kill_rx) = oneshot::channel();

        tokio::spawn(supervise(session_id, child, stderr, kill_rx, events));

        info!(
            session_id = %session_id,
            pid = ?pid,
            source = %spec.source.redacted(),
            "ffmpeg spawned"
        );

        Ok(Box::new(FfmpegProcess {
            session_id,
            pid,
            kill_tx: Some(kill_tx),
        }))
    }
}

/// Handle to a spawned `ffmpeg` process.
struct FfmpegProcess {
    session_id: Uuid,
    pid: Option<u32>,
    kill_tx: Option<oneshot::Sender<()>>,
}

impl CaptureProcess for FfmpegProcess {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    #[track_caller]
    fn interrupt(&mut self) -> CoreResult<()> {
        #[cfg(unix)]
        {
            let Some(pid) = self.pid else {
                return Err(RecorderError::SubprocessRuntime {
                    reason: "ffmpeg process id unavailable".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            };
            send_sigint(pid)?;
            debug!(session_id = %self.session_id, pid, "SIGINT sent to ffmpeg");
            Ok(())
        }

        #[cfg(not(unix))]
        {
            self.kill();
            Ok(())
        }
    }

    fn kill(&mut self) {
        if let Some(kill_tx) = self.kill_tx.take() {
            // Supervisor already gone means the process already exited.
            let _ = kill_tx.send(());
        }
    }
}

#[cfg(unix)]
#[track_caller]
fn send_sigint(pid: u32) -> CoreResult<()> {
    let pid = libc::pid_t::try_from(pid).map_err(|e| RecorderError::SubprocessRuntime {
        reason: format!("Invalid pid {}: {}", pid, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // SAFETY: libc::kill only delivers a signal. `pid` is our own child,
    // spawned in its own process group and not yet reaped by the supervisor
    // unless it already exited, in which case kill returns ESRCH.
    #[allow(unsafe_code)]
    let rc = unsafe { libc::kill(pid, libc::SIGINT) };

    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        // Already exited; the supervisor will report the exit.
        return Ok(());
    }

    Err(RecorderError::SubprocessRuntime {
        reason: format!("Failed to interrupt ffmpeg (pid {}): {}", pid, err),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Watches one ffmpeg process until it exits and reports its lifecycle.
async fn supervise(
    session_id: Uuid,
    mut child: Child,
    stderr: Option<ChildStderr>,
    mut kill_rx: oneshot::Receiver<()>,
    events: mpsc::Sender<CaptureEvent>,
) {
    let mut started = false;
    let mut kill_armed = true;
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);

    if let Some(mut stderr) = stderr {
        let mut splitter = StderrLines::default();
        let mut chunk = [0u8; STDERR_CHUNK_BYTES];
        loop {
            tokio::select! {
                read = stderr.read(&mut chunk) => match read {
                    Ok(0) => break,
                    Ok(n) => {
                        for line in splitter.push(&chunk[..n]) {
                            observe_line(&events, session_id, &mut started, &mut tail, line).await;
                        }
                    }
                    Err(e) => {
                        warn!(session_id = %session_id, error = %e, "Failed to read ffmpeg stderr");
                        break;
                    }
                },
                requested = &mut kill_rx, if kill_armed => {
                    kill_armed = false;
                    if requested.is_ok() {
                        force_kill(&mut child, session_id);
                    }
                }
            }
        }
        if let Some(line) = splitter.finish() {
            observe_line(&events, session_id, &mut started, &mut tail, line).await;
        }
    }

    let status = loop {
        let kill_now = tokio::select! {
            status = child.wait() => break status,
            requested = &mut kill_rx, if kill_armed => {
                kill_armed = false;
                requested.is_ok()
            }
        };
        if kill_now {
            force_kill(&mut child, session_id);
        }
    };

    let kind = match status {
        Ok(status) if status.success() && started => CaptureEventKind::Finished,
        Ok(status) if started => CaptureEventKind::Failed {
            reason: format!("ffmpeg exited with {}: {}", status, summarize_tail(&tail)),
        },
        Ok(status) => CaptureEventKind::Failed {
            reason: format!(
                "ffmpeg exited with {} before recording started: {}",
                status,
                summarize_tail(&tail)
            ),
        },
        Err(e) => CaptureEventKind::Failed {
            reason: format!("Failed to wait for ffmpeg: {}", e),
        },
    };

    debug!(session_id = %session_id, event = ?kind, "ffmpeg exited");
    emit(&events, session_id, kind).await;
}

/// Record one stderr line and emit `Started` on the first output header.
async fn observe_line(
    events: &mpsc::Sender<CaptureEvent>,
    session_id: Uuid,
    started: &mut bool,
    tail: &mut VecDeque<String>,
    line: String,
) {
    trace!(session_id = %session_id, line = %line, "ffmpeg stderr");
    if !*started && is_started_line(&line) {
        *started = true;
        let kind = CaptureEventKind::Started {
            at: Local::now(),
            detail: line.clone(),
        };
        emit(events, session_id, kind).await;
    }
    if tail.len() == STDERR_TAIL_LINES {
        tail.pop_front();
    }
    tail.push_back(line);
}

fn force_kill(child: &mut Child, session_id: Uuid) {
    if let Err(e) = child.start_kill() {
        warn!(session_id = %session_id, error = %e, "Failed to kill ffmpeg");
    } else {
        debug!(session_id = %session_id, "ffmpeg kill requested");
    }
}

async fn emit(events: &mpsc::Sender<CaptureEvent>, session_id: Uuid, kind: CaptureEventKind) {
    if events
        .send(CaptureEvent { session_id, kind })
        .await
        .is_err()
    {
        debug!(session_id = %session_id, "Session manager gone, dropping capture event");
    }
}

pub(crate) fn is_started_line(line: &str) -> bool {
    line.trim_start().starts_with(STARTED_MARKER)
}

pub(crate) fn summarize_tail(tail: &VecDeque<String>) -> String {
    if tail.is_empty() {
        return "no output".to_string();
    }
    tail.iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" | ")
}
