//! Request parameter binding.
//!
//! Handlers take their extractors as `Result`s and feed them through a
//! [`Binding`], which counts how many expected parameters were bound and keeps
//! the raw failure text of the rest. The final verdict goes through
//! [`classify`], so a request that could not be bound is rejected as
//! malformed (400) and one that bound but broke field rules as invalid (422).

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::{Map, Value};
use shelf_core::validation::{ErrorCategory, FieldErrors, classify};

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct Binding {
  expected: usize,
  bound:    usize,
  failures: FieldErrors,
}

impl Binding {
  /// Record one expected parameter. Returns the value if it was bound.
  pub fn param<T, E: std::fmt::Display>(
    &mut self,
    name: &str,
    extracted: Result<T, E>,
  ) -> Option<T> {
    self.expected += 1;
    match extracted {
      Ok(value) => {
        self.bound += 1;
        Some(value)
      }
      Err(e) => {
        tracing::debug!(param = name, error = %e, "parameter failed to bind");
        self
          .failures
          .entry(name.to_owned())
          .or_default()
          .push(e.to_string());
        None
      }
    }
  }

  /// Record a JSON body that must be an object.
  pub fn object(
    &mut self,
    extracted: Result<Json<Value>, JsonRejection>,
  ) -> Option<Map<String, Value>> {
    let extracted = extracted
      .map_err(|e| e.body_text())
      .and_then(|Json(value)| match value {
        Value::Object(map) => Ok(map),
        _ => Err("expected a JSON object".to_owned()),
      });
    self.param("body", extracted)
  }

  /// Record a JSON body deserialised straight into `T`.
  pub fn body<T>(&mut self, extracted: Result<Json<T>, JsonRejection>) -> Option<T> {
    self.param("body", extracted.map(|Json(value)| value).map_err(|e| e.body_text()))
  }

  /// The verdict for a request whose parameters are in and whose field
  /// rules produced `errors`.
  pub fn verdict(self, errors: FieldErrors) -> Result<(), ApiError> {
    match classify(&errors, self.bound, self.expected) {
      None => Ok(()),
      Some(ErrorCategory::SemanticallyInvalid) => Err(ApiError::Invalid(errors)),
      Some(ErrorCategory::StructurallyMalformed) => {
        Err(ApiError::Malformed(self.failures))
      }
    }
  }

  /// Reject a request where some parameter failed to bind.
  pub fn reject(self) -> ApiError {
    match self.verdict(FieldErrors::new()) {
      Err(e) => e,
      Ok(()) => ApiError::BadRequest("request could not be bound".to_owned()),
    }
  }
}
