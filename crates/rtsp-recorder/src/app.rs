use crate::{
    AppError, AppResult,
    config::Config,
    http::{self, ApiState},
};

use rtsp_recorder_core::{ArtifactStore, SessionManager};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

/// How long to wait for the session manager to finish after shutdown.
const MANAGER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(15);

/// Main application: session manager plus HTTP server.
pub struct App {
    pub(crate) config: Config,
}

impl App {
    /// Serve until SIGINT/SIGTERM, then stop any active recording.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<()> {
        let session_config = self.config.session_config();
        info!(
            source = %session_config.source.redacted(),
            output_dir = ?session_config.namer.output_dir(),
            "RTSP recorder starting"
        );

        let store = Arc::new(ArtifactStore::new(&session_config.namer));

        let (session, manager_task) = SessionManager::spawn(session_config, self.config.launcher());

        let state = ApiState {
            session: session.clone(),
            store,
            labels: Arc::new(self.config.labels.clone()),
        };
        let router = http::router(state, &self.config.server.static_dir);

        let addr = format!("{}:{}", self.config.server.bind_address, self.config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| AppError::ServerError {
            reason: format!("Failed to bind to {}: {}", addr, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(url = %self.config.server_url(), "Server is running");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::ServerError {
                reason: format!("Server error: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("HTTP server stopped, finishing active recording");

        if let Err(e) = session.shutdown().await {
            warn!(error = %e, "Session manager already stopped");
        }
        drop(session);

        match tokio::time::timeout(MANAGER_SHUTDOWN_TIMEOUT, manager_task).await {
            Ok(Ok(())) => info!("Session manager stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Session manager task panicked"),
            Err(_) => warn!(
                "Session manager did not stop within timeout, \
                     capture process may be left running"
            ),
        }

        info!("RTSP recorder shut down successfully");

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
