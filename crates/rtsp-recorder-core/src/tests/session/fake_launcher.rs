#![allow(clippy::unwrap_used)]

use crate::{
    CaptureEvent, CaptureEventKind, CaptureLauncher, CaptureProcess, CoreResult, LaunchSpec,
    RecorderError,
};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Launcher that records launches and lets tests drive lifecycle events.
pub(crate) struct FakeLauncher {
    launched_tx: mpsc::UnboundedSender<FakeLaunch>,
    fail_next: Arc<Mutex<Option<String>>>,
}

impl FakeLauncher {
    /// Returns the launcher and a stream of launches it performs.
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<FakeLaunch>) {
        let (launched_tx, launched_rx) = mpsc::unbounded_channel();
        (
            Self {
                launched_tx,
                fail_next: Arc::new(Mutex::new(None)),
            },
            launched_rx,
        )
    }

    /// Shared switch that makes the next launch fail to spawn.
    pub(crate) fn fail_switch(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.fail_next)
    }
}

impl CaptureLauncher for FakeLauncher {
    fn launch(
        &self,
        session_id: Uuid,
        spec: &LaunchSpec,
        events: mpsc::Sender<CaptureEvent>,
    ) -> CoreResult<Box<dyn CaptureProcess>> {
        if let Some(reason) = self.fail_next.lock().unwrap().take() {
            return Err(RecorderError::SubprocessLaunch {
                reason,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let signals = Arc::new(FakeSignals::default());
        let _ = self.launched_tx.send(FakeLaunch {
            session_id,
            spec: spec.clone(),
            events,
            signals: Arc::clone(&signals),
        });

        Ok(Box::new(FakeProcess { signals }))
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeSignals {
    interrupted: AtomicBool,
    killed: AtomicBool,
}

struct FakeProcess {
    signals: Arc<FakeSignals>,
}

impl CaptureProcess for FakeProcess {
    fn pid(&self) -> Option<u32> {
        Some(4242)
    }

    fn interrupt(&mut self) -> CoreResult<()> {
        self.signals.interrupted.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn kill(&mut self) {
        self.signals.killed.store(true, Ordering::SeqCst);
    }
}

/// One recorded launch, able to emit events as its process would.
#[derive(Clone)]
pub(crate) struct FakeLaunch {
    pub(crate) session_id: Uuid,
    pub(crate) spec: LaunchSpec,
    events: mpsc::Sender<CaptureEvent>,
    signals: Arc<FakeSignals>,
}

impl FakeLaunch {
    pub(crate) async fn started_at(&self, at: DateTime<Local>) {
        self.emit(CaptureEventKind::Started {
            at,
            detail: "Output #0, mp4".to_string(),
        })
        .await;
    }

    pub(crate) async fn finished(&self) {
        self.emit(CaptureEventKind::Finished).await;
    }

    pub(crate) async fn failed(&self, reason: &str) {
        self.emit(CaptureEventKind::Failed {
            reason: reason.to_string(),
        })
        .await;
    }

    pub(crate) fn interrupted(&self) -> bool {
        self.signals.interrupted.load(Ordering::SeqCst)
    }

    pub(crate) fn killed(&self) -> bool {
        self.signals.killed.load(Ordering::SeqCst)
    }

    async fn emit(&self, kind: CaptureEventKind) {
        self.events
            .send(CaptureEvent {
                session_id: self.session_id,
                kind,
            })
            .await
            .unwrap();
    }
}
