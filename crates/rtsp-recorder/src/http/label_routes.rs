use crate::http::ApiState;

use std::collections::BTreeMap;

use axum::{Json, extract::State};

/// Display labels configured through `LABEL_*` variables.
pub(crate) async fn labels(State(state): State<ApiState>) -> Json<BTreeMap<String, String>> {
    Json(state.labels.as_ref().clone())
}
