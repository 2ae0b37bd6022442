use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::types::SchemaError;

/// Error surface for the REST handlers.
///
/// Schema rejections and explicit not-founds get their own statuses;
/// everything else falls through to a 500 carrying the underlying
/// message. Bodies are always `{"detail": ...}`.
pub enum ApiError {
  Validation(SchemaError),
  NotFound(String),
  Internal(anyhow::Error),
}

impl ApiError {
  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::NotFound(msg.into())
  }
}

impl From<SchemaError> for ApiError {
  fn from(e: SchemaError) -> Self {
    Self::Validation(e)
  }
}

impl From<anyhow::Error> for ApiError {
  fn from(e: anyhow::Error) -> Self {
    Self::Internal(e)
  }
}

impl From<serde_json::Error> for ApiError {
  fn from(e: serde_json::Error) -> Self {
    Self::Internal(e.into())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match self {
      Self::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
      Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
      Self::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(serde_json::json!({ "detail": detail }))).into_response()
  }
}
