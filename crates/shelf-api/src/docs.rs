//! Generated API documents, one per known version.
//!
//! Documents are rendered once from the [`ApiCatalog`] when the router is
//! built and served as static JSON from `GET /docs/{version}`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
  routing::MethodFilter,
};
use serde_json::{Map, Value, json};
use shelf_core::version::{ApiCatalog, VersionTag};

use crate::{ApiConfig, error::ApiError};

// ─── Operation descriptors ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verb {
  Get,
  Post,
  Put,
  Patch,
}

impl Verb {
  pub fn as_str(self) -> &'static str {
    match self {
      Verb::Get => "GET",
      Verb::Post => "POST",
      Verb::Put => "PUT",
      Verb::Patch => "PATCH",
    }
  }

  pub fn filter(self) -> MethodFilter {
    match self {
      Verb::Get => MethodFilter::GET,
      Verb::Post => MethodFilter::POST,
      Verb::Put => MethodFilter::PUT,
      Verb::Patch => MethodFilter::PATCH,
    }
  }
}

/// Documentation-facing description of one registered operation variant.
#[derive(Debug, Clone)]
pub struct Operation {
  pub id:      &'static str,
  pub verb:    Verb,
  pub path:    &'static str,
  pub summary: &'static str,
}

// ─── Documents ───────────────────────────────────────────────────────────────

/// Rendered documents keyed by version.
#[derive(Debug, Default)]
pub struct Documents {
  by_version: BTreeMap<VersionTag, Value>,
}

impl Documents {
  pub fn generate(catalog: &ApiCatalog<Operation>, config: &ApiConfig) -> Self {
    let by_version = catalog
      .versions()
      .map(|version| {
        let operations = catalog.partition(version).unwrap_or_default();
        (version, render(version, operations, config))
      })
      .collect();
    Self { by_version }
  }

  pub fn get(&self, version: VersionTag) -> Option<&Value> {
    self.by_version.get(&version)
  }

  pub fn versions(&self) -> impl Iterator<Item = VersionTag> + '_ {
    self.by_version.keys().copied()
  }
}

fn render(version: VersionTag, operations: &[Operation], config: &ApiConfig) -> Value {
  let mut paths: BTreeMap<&str, Map<String, Value>> = BTreeMap::new();
  for op in operations {
    paths.entry(op.path).or_default().insert(
      op.verb.as_str().to_ascii_lowercase(),
      json!({ "operationId": op.id, "summary": op.summary }),
    );
  }

  json!({
    "openapi": "3.0.1",
    "info": {
      "title":       config.title,
      "description": config.description,
      "version":     version.to_string(),
    },
    "paths": paths,
  })
}

/// `GET /docs/{version}`, e.g. `/docs/1.0`.
pub async fn handler(
  State(documents): State<Arc<Documents>>,
  Path(version): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let version: VersionTag = version
    .parse()
    .map_err(|e: shelf_core::Error| ApiError::BadRequest(e.to_string()))?;
  documents
    .get(version)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("no document for api version {version}")))
}

#[cfg(test)]
mod tests {
  use shelf_core::version::Candidate;

  use super::*;

  const V1: VersionTag = VersionTag::new(1, 0);
  const V2: VersionTag = VersionTag::new(2, 0);

  fn op(id: &'static str, verb: Verb, path: &'static str) -> Operation {
    Operation {
      id,
      verb,
      path,
      summary: "",
    }
  }

  #[test]
  fn one_document_per_version_with_its_partition() {
    let catalog = ApiCatalog::build(V1, &[
      Candidate::new([V1], op("GetAuthors", Verb::Get, "/authors")),
      Candidate::new([V2], op("GetAuthorsV2", Verb::Get, "/authors")),
      Candidate::neutral(op("CreateBook", Verb::Post, "/authors/{author_id}/books")),
    ]);
    let docs = Documents::generate(&catalog, &ApiConfig::default());

    assert_eq!(docs.versions().collect::<Vec<_>>(), vec![V1, V2]);

    let v1 = docs.get(V1).unwrap();
    assert_eq!(v1["info"]["version"], "1.0");
    assert_eq!(v1["paths"]["/authors"]["get"]["operationId"], "GetAuthors");
    assert_eq!(
      v1["paths"]["/authors/{author_id}/books"]["post"]["operationId"],
      "CreateBook"
    );

    let v2 = docs.get(V2).unwrap();
    assert_eq!(v2["paths"]["/authors"]["get"]["operationId"], "GetAuthorsV2");
    assert!(v2["paths"]["/authors/{author_id}/books"].is_object());
  }
}
