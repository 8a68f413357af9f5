//! Per-request API version selection.
//!
//! A request names its version with the `api-version` query parameter or the
//! `api-version` header. Each route slot (path + method) holds one method
//! router per registered variant; [`Slot::dispatch`] resolves the version and
//! hands the already-routed request to the matching variant.

use std::sync::Arc;

use axum::{
  extract::{Query, Request},
  http::{HeaderMap, Uri},
  response::{IntoResponse, Response},
  routing::MethodRouter,
};
use serde::Deserialize;
use shelf_core::version::{Candidate, VersionTag, resolve_handler};
use tower::ServiceExt as _;

use crate::error::ApiError;

pub const VERSION_PARAM: &str = "api-version";

#[derive(Debug, Deserialize)]
struct VersionQuery {
  #[serde(rename = "api-version")]
  api_version: Option<String>,
}

/// Read the version designated by a request, if any.
///
/// The query parameter and the header may both be given, but must agree.
pub fn requested_version(
  uri: &Uri,
  headers: &HeaderMap,
) -> Result<Option<VersionTag>, ApiError> {
  let from_query = Query::<VersionQuery>::try_from_uri(uri)
    .map_err(|e| ApiError::BadRequest(e.body_text()))?
    .0
    .api_version;

  let from_header = headers
    .get(VERSION_PARAM)
    .map(|v| {
      v.to_str()
        .map(str::to_owned)
        .map_err(|_| ApiError::BadRequest(format!("{VERSION_PARAM} header is not valid text")))
    })
    .transpose()?;

  let parse = |s: &str| {
    s.parse::<VersionTag>()
      .map_err(|e| ApiError::BadRequest(e.to_string()))
  };

  match (from_query, from_header) {
    (None, None) => Ok(None),
    (Some(q), None) => parse(&q).map(Some),
    (None, Some(h)) => parse(&h).map(Some),
    (Some(q), Some(h)) => {
      let (q, h) = (parse(&q)?, parse(&h)?);
      if q == h {
        Ok(Some(q))
      } else {
        Err(ApiError::BadRequest(format!(
          "conflicting api versions: {q} in query, {h} in header"
        )))
      }
    }
  }
}

/// Every registered variant of one path + method.
pub(crate) struct Slot {
  pub label:      String,
  pub default:    VersionTag,
  pub candidates: Vec<Candidate<MethodRouter>>,
}

impl Slot {
  pub async fn dispatch(self: Arc<Self>, req: Request) -> Response {
    let requested = match requested_version(req.uri(), req.headers()) {
      Ok(v) => v,
      Err(e) => return e.into_response(),
    };

    match resolve_handler(requested, self.default, &self.candidates) {
      Ok(variant) => {
        tracing::debug!(
          operation = %self.label,
          version = %requested.unwrap_or(self.default),
          "dispatching"
        );
        match variant.clone().oneshot(req).await {
          Ok(response) => response,
          Err(never) => match never {},
        }
      }
      Err(e) => {
        tracing::warn!(operation = %self.label, error = %e, "no variant for version");
        ApiError::from(e).into_response()
      }
    }
  }
}
