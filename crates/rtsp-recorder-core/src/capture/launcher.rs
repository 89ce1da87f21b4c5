use crate::{CoreResult, capture::CaptureEvent, capture::RtspSource};

use std::path::PathBuf;

use tokio::sync::mpsc;
use uuid::Uuid;

/// Everything a launcher needs to start one capture.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Stream to pull from.
    pub source: RtspSource,
    /// File the capture is written to.
    pub output_path: PathBuf,
}

/// A running capture process owned by the session manager.
pub trait CaptureProcess: Send {
    /// OS process id, if the process is still known to be running.
    fn pid(&self) -> Option<u32>;

    /// Ask the process to stop and finalize its output. Does not wait for exit.
    fn interrupt(&mut self) -> CoreResult<()>;

    /// Force the process to exit. Does not wait for exit.
    fn kill(&mut self);
}

/// Starts capture processes and wires their lifecycle onto an event channel.
///
/// Implementations must send events for `session_id` in the order
/// `Started` then one terminal event, or a single terminal event if the
/// process never confirms startup.
pub trait CaptureLauncher: Send + Sync {
    /// Spawn a capture process for `spec`.
    ///
    /// # Errors
    ///
    /// Returns `SubprocessLaunch` if the process cannot be spawned.
    fn launch(
        &self,
        session_id: Uuid,
        spec: &LaunchSpec,
        events: mpsc::Sender<CaptureEvent>,
    ) -> CoreResult<Box<dyn CaptureProcess>>;
}

/// A launched capture tracked by the session manager.
pub(crate) struct ActiveCapture {
    pub(crate) session_id: Uuid,
    pub(crate) process: Box<dyn CaptureProcess>,
    pub(crate) output_path: PathBuf,
}

impl ActiveCapture {
    pub(crate) fn file_name(&self) -> Option<String> {
        self.output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}
