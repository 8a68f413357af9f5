//! JSON-Patch (RFC 6902 shaped) application over [`FieldSchema`] records.
//!
//! Operations run in list order against a private copy of the target. Any
//! failure discards the copy, so a rejected patch has no effect at all and
//! the caller's value is never touched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::schema::{Field, FieldSchema};

/// One patch instruction, tagged on the wire by `op`.
///
/// `value` is mandatory for `add`, `replace` and `test`; `from` is mandatory
/// for `move` and `copy`. Any other `op` fails to deserialise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
  Add { path: String, value: Value },
  Remove { path: String },
  Replace { path: String, value: Value },
  Move { from: String, path: String },
  Copy { from: String, path: String },
  Test { path: String, value: Value },
}

impl PatchOperation {
  /// The target path of the operation.
  pub fn path(&self) -> &str {
    match self {
      Self::Add { path, .. }
      | Self::Remove { path }
      | Self::Replace { path, .. }
      | Self::Move { path, .. }
      | Self::Copy { path, .. }
      | Self::Test { path, .. } => path,
    }
  }
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchFailureReason {
  TestMismatch,
  UnknownPath,
  IllegalRemoval,
  MissingSource,
  InvalidValue,
}

impl fmt::Display for PatchFailureReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::TestMismatch => "test operation failed",
      Self::UnknownPath => "unknown path",
      Self::IllegalRemoval => "cannot remove a required field",
      Self::MissingSource => "source path does not exist",
      Self::InvalidValue => "value has the wrong type",
    })
  }
}

/// Why a patch was rejected and at which path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at {path:?}")]
pub struct PatchFailure {
  pub reason: PatchFailureReason,
  pub path:   String,
}

impl PatchFailure {
  fn new(reason: PatchFailureReason, path: &str) -> Self {
    Self {
      reason,
      path: path.to_owned(),
    }
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Apply `operations` to a copy of `resource` and return the result.
///
/// Later operations observe the effects of earlier ones. An empty list
/// returns an equal copy.
pub fn apply<T: FieldSchema>(
  resource: &T,
  operations: &[PatchOperation],
) -> Result<T, PatchFailure> {
  let mut working = resource.clone();
  for operation in operations {
    apply_one(&mut working, operation)?;
  }
  Ok(working)
}

fn apply_one<T: FieldSchema>(
  target: &mut T,
  operation: &PatchOperation,
) -> Result<(), PatchFailure> {
  match operation {
    PatchOperation::Add { path, value }
    | PatchOperation::Replace { path, value } => {
      write(target, resolve(path)?, path, value.clone())
    }
    PatchOperation::Remove { path } => remove(target, resolve(path)?, path),
    PatchOperation::Move { from, path } => {
      let source = resolve_source(target, from)?;
      let dest = resolve(path)?;
      if std::ptr::eq(source, dest) {
        return Ok(());
      }
      let value = (source.get)(target);
      remove(target, source, from)?;
      write(target, dest, path, value)
    }
    PatchOperation::Copy { from, path } => {
      let source = resolve_source(target, from)?;
      let dest = resolve(path)?;
      let value = (source.get)(target);
      write(target, dest, path, value)
    }
    PatchOperation::Test { path, value } => {
      let field = resolve::<T>(path)?;
      if (field.get)(target) == *value {
        Ok(())
      } else {
        Err(PatchFailure::new(PatchFailureReason::TestMismatch, path))
      }
    }
  }
}

fn write<T>(
  target: &mut T,
  field: &Field<T>,
  path: &str,
  value: Value,
) -> Result<(), PatchFailure> {
  (field.set)(target, value)
    .map_err(|_| PatchFailure::new(PatchFailureReason::InvalidValue, path))
}

fn remove<T>(
  target: &mut T,
  field: &Field<T>,
  path: &str,
) -> Result<(), PatchFailure> {
  if field.required {
    return Err(PatchFailure::new(PatchFailureReason::IllegalRemoval, path));
  }
  write(target, field, path, Value::Null)
}

fn resolve<T: FieldSchema>(path: &str) -> Result<&'static Field<T>, PatchFailure> {
  field_name(path)
    .and_then(|name| T::field(&name))
    .ok_or_else(|| PatchFailure::new(PatchFailureReason::UnknownPath, path))
}

/// A source must name a declared field that currently holds a value.
fn resolve_source<T: FieldSchema>(
  target: &T,
  from: &str,
) -> Result<&'static Field<T>, PatchFailure> {
  field_name(from)
    .and_then(|name| T::field(&name))
    .filter(|field| !(field.get)(target).is_null())
    .ok_or_else(|| PatchFailure::new(PatchFailureReason::MissingSource, from))
}

/// Reduce a path to a single field name.
///
/// `/firstname` is the wire form; `firstname` (dot-delimited, no leading
/// slash) is accepted as well. Resources are flat, so anything with more than
/// one segment resolves to nothing.
fn field_name(path: &str) -> Option<String> {
  let mut segments: Vec<&str> = match path.strip_prefix('/') {
    Some(rest) => rest.split('/').collect(),
    None => path.split('.').collect(),
  };
  if segments.len() != 1 {
    return None;
  }
  let segment = segments.remove(0);
  if segment.is_empty() {
    return None;
  }
  Some(segment.replace("~1", "/").replace("~0", "~"))
}
