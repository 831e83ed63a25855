use axum::{Json, extract::State};
use chrono::Utc;

use crate::{AppState, errors::ApiError};

/// GET /health
/// Response: 200 OK with JSON, 503 when the document store does not answer
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(serde_json::json!({
      "status": "healthy",
      "timestamp": Utc::now().timestamp()
    })))
}
