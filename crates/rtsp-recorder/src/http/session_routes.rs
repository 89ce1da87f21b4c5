use crate::http::{ApiError, ApiState};

use rtsp_recorder_core::{RecorderError, SessionStatus};

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

/// Body of a successful `/start`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartResponse {
    pub(crate) message: &'static str,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) file: String,
}

#[instrument(skip(state))]
pub(crate) async fn start(State(state): State<ApiState>) -> Result<Json<StartResponse>, ApiError> {
    let started = state.session.start().await.map_err(start_error)?;

    let file = started
        .output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!(session_id = %started.session_id, file = %file, "Start request completed");

    Ok(Json(StartResponse {
        message: "Recording started",
        start_time: started.start_time.with_timezone(&Utc),
        file,
    }))
}

#[instrument(skip(state))]
pub(crate) async fn stop(State(state): State<ApiState>) -> Result<&'static str, ApiError> {
    match state.session.stop().await {
        Ok(stopped) => {
            info!(
                session_id = %stopped.session_id,
                output_path = ?stopped.output_path,
                "Stop request completed"
            );
            Ok("Recording stopped")
        }
        Err(RecorderError::NotRecording { .. }) => Err(ApiError::text(
            StatusCode::BAD_REQUEST,
            "No recording in progress",
        )),
        Err(e) => {
            error!(error = %e, "Stop request failed");
            Err(ApiError::text(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to stop recording",
            ))
        }
    }
}

#[instrument(skip(state))]
pub(crate) async fn status(
    State(state): State<ApiState>,
) -> Result<Json<SessionStatus>, ApiError> {
    state.session.status().await.map(Json).map_err(|e| {
        error!(error = %e, "Status request failed");
        ApiError::text(StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable")
    })
}

fn start_error(e: RecorderError) -> ApiError {
    let api_error = match &e {
        RecorderError::AlreadyRecording { .. } => {
            ApiError::text(StatusCode::BAD_REQUEST, "Recording already in progress")
        }
        RecorderError::Finalizing { .. } => ApiError::text(
            StatusCode::CONFLICT,
            "Previous recording is still finalizing",
        ),
        RecorderError::StartAborted { .. } => ApiError::text(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Recording was stopped before it started",
        ),
        RecorderError::StartupTimeout { timeout_secs, .. } => ApiError::text(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Recording did not start within {}s", timeout_secs),
        ),
        _ => ApiError::text(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to start recording",
        ),
    };

    if api_error.status().is_server_error() {
        error!(error = %e, "Start request failed");
    } else {
        warn!(error = %e, "Start request rejected");
    }

    api_error
}
