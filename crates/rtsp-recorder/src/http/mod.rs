//! HTTP facade over the session handle and artifact store.

mod api_error;
mod label_routes;
mod recording_routes;
mod session_routes;

pub(crate) use api_error::ApiError;

use rtsp_recorder_core::{ArtifactStore, SessionHandle};

use std::{collections::BTreeMap, path::Path, sync::Arc};

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub(crate) struct ApiState {
    pub(crate) session: SessionHandle,
    pub(crate) store: Arc<ArtifactStore>,
    pub(crate) labels: Arc<BTreeMap<String, String>>,
}

/// Build the application router. Unmatched paths are served from `static_dir`.
pub(crate) fn router(state: ApiState, static_dir: &Path) -> Router {
    Router::new()
        .route("/start", get(session_routes::start))
        .route("/stop", get(session_routes::stop))
        .route("/status", get(session_routes::status))
        .route("/recordings", get(recording_routes::list))
        .route(
            "/recordings/{filename}",
            get(recording_routes::download).delete(recording_routes::delete),
        )
        .route("/labels", get(label_routes::labels))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
