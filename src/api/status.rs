use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;

/// GET / - Service banner
pub async fn root() -> Json<Value> {
  Json(json!({ "message": "Hearth API running" }))
}

/// GET /test - Connectivity diagnostics
///
/// Reports the backend flavor, whether a connection string is present in
/// the environment (never its value), the configured database name, and
/// the collections currently holding records. A store that cannot be
/// reached surfaces as an internal error.
pub async fn connection_test(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
  let collections = state.store.list_collections().await?;
  Ok(Json(json!({
    "backend": state.store.dialect().name(),
    "database": "connected",
    "database_url": std::env::var("DATABASE_URL").map(|v| !v.is_empty()).unwrap_or(false),
    "database_name": state.database_name,
    "connection_status": "ok",
    "collections": collections,
  })))
}

/// Liveness probe - returns 200 if the server is running
pub async fn health_check() -> StatusCode {
  StatusCode::OK
}

/// Readiness probe - returns 200 if the store is accessible
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
  match state.store.list_collections().await {
    Ok(_) => StatusCode::OK,
    Err(_) => StatusCode::SERVICE_UNAVAILABLE,
  }
}
