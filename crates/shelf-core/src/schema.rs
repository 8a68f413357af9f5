//! Schema-driven field access for wire representations.
//!
//! Every representation that can be bound from a JSON object or patched
//! declares a static table of [`Field`]s: a wire name plus a typed getter and
//! setter. The patch engine and the request binder walk that table instead of
//! inspecting types at runtime.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::validation::FieldErrors;

/// A single addressable field of `T`.
pub struct Field<T> {
  /// Wire name, e.g. `firstName`. Lookups are ASCII case-insensitive.
  pub name:     &'static str,
  /// Required fields may not be removed by a patch.
  pub required: bool,
  /// Current value as JSON; `Value::Null` when the field is empty.
  pub get:      fn(&T) -> Value,
  /// Overwrite the field. `Err` carries a human-readable type mismatch.
  pub set:      fn(&mut T, Value) -> Result<(), String>,
}

/// A representation described by a static field table.
pub trait FieldSchema: Clone + 'static {
  const FIELDS: &'static [Field<Self>];

  /// Look up a field by wire name, ignoring ASCII case.
  fn field(name: &str) -> Option<&'static Field<Self>> {
    Self::FIELDS
      .iter()
      .find(|f| f.name.eq_ignore_ascii_case(name))
  }

  /// Bind a JSON object field by field.
  ///
  /// Keys that match no declared field are ignored. A key whose value has the
  /// wrong JSON type leaves the field empty and records an error against it.
  fn from_object(object: &Map<String, Value>) -> (Self, FieldErrors)
  where
    Self: Default,
  {
    let mut target = Self::default();
    let mut errors = FieldErrors::new();
    for (key, value) in object {
      let Some(field) = Self::field(key) else { continue };
      if let Err(message) = (field.set)(&mut target, value.clone()) {
        errors.entry(field.name.to_owned()).or_default().push(message);
      }
    }
    (target, errors)
  }
}

// ─── Value conversions ───────────────────────────────────────────────────────

/// Describe the JSON type of `value` for error messages.
pub fn json_type(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

/// `null` → `None`, string → `Some`, anything else is a type mismatch.
pub fn opt_string(value: Value) -> Result<Option<String>, String> {
  match value {
    Value::Null => Ok(None),
    Value::String(s) => Ok(Some(s)),
    other => Err(format!("expected a string, found {}", json_type(&other))),
  }
}

/// `null` → `None`, `YYYY-MM-DD` string → `Some(date)`.
pub fn opt_date(value: Value) -> Result<Option<NaiveDate>, String> {
  match opt_string(value)? {
    None => Ok(None),
    Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
      .map(Some)
      .map_err(|_| format!("expected a date in YYYY-MM-DD form, found {s:?}")),
  }
}

pub fn string_value(value: &Option<String>) -> Value {
  value.as_deref().map_or(Value::Null, |s| Value::String(s.to_owned()))
}

pub fn date_value(value: &Option<NaiveDate>) -> Value {
  value.map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string()))
}
