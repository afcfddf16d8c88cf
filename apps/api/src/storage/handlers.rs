//! Axum route handlers for raw key/value access from the web client.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StoredValue {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct PutValue {
    pub value: Value,
}

/// GET /api/v1/store/:key
pub async fn handle_get_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StoredValue>, AppError> {
    let value = state
        .store
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Key '{key}' not found")))?;
    Ok(Json(StoredValue { key, value }))
}

/// PUT /api/v1/store/:key
pub async fn handle_put_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutValue>,
) -> Result<StatusCode, AppError> {
    state.store.set(&key, req.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/store/:key
pub async fn handle_delete_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.store.delete(&key).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Key '{key}' not found")))
    }
}
