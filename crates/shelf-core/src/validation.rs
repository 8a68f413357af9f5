//! Field validation and the malformed-vs-invalid classifier.
//!
//! A request is *structurally malformed* when some expected input could not
//! be bound at all, and *semantically invalid* when everything bound but the
//! bound values break a field rule. The first maps to 400, the second to 422.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field path → error messages, ordered by path for stable output.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
  /// Understood, but violates field rules.
  SemanticallyInvalid,
  /// The request shape itself could not be interpreted.
  StructurallyMalformed,
}

/// Decide how a request with the given validation outcome is rejected.
///
/// The decision depends only on whether every expected parameter was bound;
/// which fields failed is irrelevant. A parameter that silently failed to
/// bind makes the request malformed even when no field error was recorded.
/// Returns `None` for a fully bound request without errors.
pub fn classify(
  errors: &FieldErrors,
  bound: usize,
  expected: usize,
) -> Option<ErrorCategory> {
  if bound < expected {
    Some(ErrorCategory::StructurallyMalformed)
  } else if errors.is_empty() {
    None
  } else {
    Some(ErrorCategory::SemanticallyInvalid)
  }
}

/// Merge rule errors into binding errors.
///
/// A field that already failed to bind keeps only its binding error; the
/// rules ran against an empty value and would just add noise.
pub fn combine(mut binding: FieldErrors, rules: FieldErrors) -> FieldErrors {
  for (field, messages) in rules {
    binding.entry(field).or_insert(messages);
  }
  binding
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// A representation that can check its own field rules.
pub trait Validate {
  fn validate(&self) -> FieldErrors;
}

/// Accumulator for the generic field rules.
#[derive(Debug, Default)]
pub struct Rules {
  errors: FieldErrors,
}

impl Rules {
  /// Absent or blank strings fail.
  pub fn required(&mut self, field: &str, value: Option<&str>) {
    if value.is_none_or(|v| v.trim().is_empty()) {
      self.push(field, format!("the {field} field is required"));
    }
  }

  pub fn present(&mut self, field: &str, present: bool) {
    if !present {
      self.push(field, format!("the {field} field is required"));
    }
  }

  /// Length is counted in characters, not bytes.
  pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
    if value.is_some_and(|v| v.chars().count() > max) {
      self.push(
        field,
        format!("the {field} field must be at most {max} characters"),
      );
    }
  }

  pub fn finish(self) -> FieldErrors { self.errors }

  fn push(&mut self, field: &str, message: String) {
    self.errors.entry(field.to_owned()).or_default().push(message);
  }
}
