use crate::http::{ApiError, ApiState};

use rtsp_recorder_core::RecorderError;

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use tokio_util::io::ReaderStream;
use tracing::{error, instrument, warn};

/// Artifact names, newest first.
#[instrument(skip(state))]
pub(crate) async fn list(State(state): State<ApiState>) -> Result<Json<Vec<String>>, ApiError> {
    state.store.list().await.map(Json).map_err(|e| {
        error!(error = %e, "Failed to list recordings");
        ApiError::text(StatusCode::INTERNAL_SERVER_ERROR, "Unable to list recordings")
    })
}

/// Stream one artifact as an attachment.
#[instrument(skip(state))]
pub(crate) async fn download(
    State(state): State<ApiState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let artifact = state.store.open(&filename).await.map_err(|e| match e {
        RecorderError::InvalidArtifactName { .. } => {
            warn!(error = %e, "Rejected download");
            ApiError::text(StatusCode::BAD_REQUEST, "Invalid file name")
        }
        _ => {
            error!(error = %e, "Failed to download file");
            ApiError::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to download file")
        }
    })?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.name);
    let body = Body::from_stream(ReaderStream::new(artifact.file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(&artifact.name))
        .header(header::CONTENT_LENGTH, artifact.len)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(body)
        .map_err(|e| {
            error!(error = %e, "Failed to build download response");
            ApiError::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to download file")
        })
}

/// Delete one artifact.
#[instrument(skip(state))]
pub(crate) async fn delete(
    State(state): State<ApiState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.store.delete(&filename).await {
        Ok(()) => Ok(Json(json!({ "message": "Recording deleted successfully" }))),
        Err(e @ RecorderError::InvalidArtifactName { .. }) => {
            warn!(error = %e, "Rejected delete");
            Err(ApiError::json(StatusCode::BAD_REQUEST, "Invalid file name"))
        }
        Err(e) => {
            error!(error = %e, "Failed to delete recording");
            Err(ApiError::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete recording",
            ))
        }
    }
}

fn content_type(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("mov") => "video/quicktime",
        Some("ts") => "video/mp2t",
        _ => "application/octet-stream",
    }
}
