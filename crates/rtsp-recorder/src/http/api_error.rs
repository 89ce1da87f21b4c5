use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failure response returned by HTTP handlers.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// Plain text body.
    Text(StatusCode, String),
    /// JSON `{ "error": ... }` body.
    Json(StatusCode, String),
}

impl ApiError {
    pub(crate) fn text(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Text(status, message.into())
    }

    pub(crate) fn json(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Json(status, message.into())
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            ApiError::Text(status, _) | ApiError::Json(status, _) => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Text(status, message) => (status, message).into_response(),
            ApiError::Json(status, message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}
