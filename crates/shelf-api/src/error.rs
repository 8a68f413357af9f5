//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use shelf_core::{
  patch::PatchFailure,
  validation::FieldErrors,
  version::{NoMatchingVersion, VersionTag},
};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Some expected input could not be bound at all. Carries the raw binding
  /// failures per parameter.
  #[error("malformed request")]
  Malformed(FieldErrors),

  /// Everything bound, but field rules failed.
  #[error("validation failed")]
  Invalid(FieldErrors),

  #[error("patch rejected: {0}")]
  Patch(#[from] PatchFailure),

  #[error("unsupported api version {0}")]
  UnsupportedVersion(VersionTag),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<NoMatchingVersion> for ApiError {
  fn from(NoMatchingVersion(v): NoMatchingVersion) -> Self {
    ApiError::UnsupportedVersion(v)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Malformed(details) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "malformed request", "details": details })),
      )
        .into_response(),
      ApiError::Invalid(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
          "title":  "One or more validation errors occurred.",
          "status": StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
          "errors": errors,
        })),
      )
        .into_response(),
      ApiError::Patch(failure) => (
        StatusCode::BAD_REQUEST,
        Json(json!({
          "error":  failure.to_string(),
          "reason": failure.reason,
          "path":   failure.path,
        })),
      )
        .into_response(),
      ApiError::UnsupportedVersion(v) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": format!("unsupported api version {v}") })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}
