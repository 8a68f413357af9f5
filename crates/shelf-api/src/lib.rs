//! Versioned JSON REST API for Shelf.
//!
//! Exposes an axum [`Router`] backed by any [`shelf_core::store::LibraryStore`].
//! Every operation is registered with the API versions it serves; requests
//! pick a version with `?api-version=2.0` or an `api-version` header and
//! default to [`ApiConfig::default_version`]. One generated document per
//! version is served from `/docs/{version}`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", shelf_api::api_router(store.clone(), &config.api)?)
//! ```

pub mod authors;
pub mod binding;
pub mod books;
pub mod docs;
pub mod error;
pub mod versioning;

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Router,
  extract::Request,
  routing::{MethodRouter, get, patch, post, put},
};
use serde::Deserialize;
use shelf_core::{
  store::LibraryStore,
  version::{AmbiguousRegistration, ApiCatalog, Candidate, VersionTag, check_unambiguous},
};

use docs::{Documents, Operation, Verb};
use versioning::Slot;

pub use error::ApiError;

pub const V1_0: VersionTag = VersionTag::new(1, 0);
pub const V2_0: VersionTag = VersionTag::new(2, 0);

// ─── Configuration ────────────────────────────────────────────────────────────

/// API metadata and version defaults, usually the `[api]` table of the
/// server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub title:           String,
  pub description:     String,
  /// Version served to requests that do not designate one.
  pub default_version: VersionTag,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      title:           "Shelf API".to_owned(),
      description:     "Authors and their books.".to_owned(),
      default_version: VersionTag::DEFAULT,
    }
  }
}

// ─── Registration table ───────────────────────────────────────────────────────

/// One operation variant: its description, the versions it serves and the
/// handler route.
struct Registration<S> {
  operation: Operation,
  versions:  Vec<VersionTag>,
  route:     MethodRouter<Arc<S>>,
}

fn registration<S>(
  id: &'static str,
  verb: Verb,
  path: &'static str,
  summary: &'static str,
  versions: &[VersionTag],
  route: MethodRouter<Arc<S>>,
) -> Registration<S> {
  Registration {
    operation: Operation {
      id,
      verb,
      path,
      summary,
    },
    versions: versions.to_vec(),
    route,
  }
}

fn registrations<S>() -> Vec<Registration<S>>
where
  S: LibraryStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  use Verb::*;

  let author_list = "/authors";
  let author_item = "/authors/{author_id}";
  let book_list = "/authors/{author_id}/books";
  let book_item = "/authors/{author_id}/books/{book_id}";

  vec![
    // Authors
    registration(
      "GetAuthors", Get, author_list, "List all authors",
      &[V1_0], get(authors::list::<S>),
    ),
    registration(
      "GetAuthorsV2", Get, author_list, "List all authors as summaries",
      &[V2_0], get(authors::list_summaries::<S>),
    ),
    registration(
      "CreateAuthor", Post, author_list, "Create an author",
      &[V1_0, V2_0], post(authors::create::<S>),
    ),
    registration(
      "GetAuthor", Get, author_item, "Get an author by id",
      &[V1_0, V2_0], get(authors::get_one::<S>),
    ),
    registration(
      "UpdateAuthor", Put, author_item, "Replace the mutable fields of an author",
      &[V1_0, V2_0], put(authors::update::<S>),
    ),
    registration(
      "PartiallyUpdateAuthor", Patch, author_item, "Apply a JSON-Patch document to an author",
      &[V1_0, V2_0], patch(authors::partial_update::<S>),
    ),
    // Books (version-neutral)
    registration(
      "GetBooks", Get, book_list, "List the books of an author",
      &[], get(books::list::<S>),
    ),
    registration(
      "GetBook", Get, book_item, "Get one book of an author",
      &[], get(books::get_one::<S>),
    ),
    registration(
      "CreateBook", Post, book_list, "Add a book to an author",
      &[], post(books::create::<S>),
    ),
  ]
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// Version tables and documents are computed here, once. Fails if two
/// variants of the same path and method claim the same version.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(
  store: Arc<S>,
  config: &ApiConfig,
) -> Result<Router<()>, AmbiguousRegistration>
where
  S: LibraryStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  build_router(store, config, registrations::<S>())
}

fn build_router<S>(
  store: Arc<S>,
  config: &ApiConfig,
  registrations: Vec<Registration<S>>,
) -> Result<Router<()>, AmbiguousRegistration>
where
  S: LibraryStore + 'static,
{
  let described: Vec<Candidate<Operation>> = registrations
    .iter()
    .map(|r| Candidate::new(r.versions.iter().copied(), r.operation.clone()))
    .collect();
  let catalog = ApiCatalog::build(config.default_version, &described);
  let documents = Arc::new(Documents::generate(&catalog, config));

  // Group variants by path + method. Each variant is a bare method router:
  // the outer route has already matched the path and captured its params.
  let mut slots: BTreeMap<(&'static str, Verb), Vec<Candidate<MethodRouter>>> =
    BTreeMap::new();
  for r in registrations {
    let variant = r.route.with_state(store.clone());
    slots
      .entry((r.operation.path, r.operation.verb))
      .or_default()
      .push(Candidate::new(r.versions, variant));
  }

  let mut paths: BTreeMap<&'static str, MethodRouter> = BTreeMap::new();
  for ((path, verb), candidates) in slots {
    let label = format!("{} {path}", verb.as_str());
    check_unambiguous(&label, &candidates)?;

    let slot = Arc::new(Slot {
      label,
      default: config.default_version,
      candidates,
    });
    let method_router = paths.remove(path).unwrap_or_else(MethodRouter::new);
    paths.insert(
      path,
      method_router.on(verb.filter(), move |req: Request| slot.clone().dispatch(req)),
    );
  }

  let router = paths
    .into_iter()
    .fold(Router::new(), |router, (path, method_router)| {
      router.route(path, method_router)
    })
    .route("/docs/{version}", get(docs::handler).with_state(documents));

  tracing::info!(
    versions = ?catalog.versions().map(|v| v.to_string()).collect::<Vec<_>>(),
    default = %catalog.default_version(),
    "api router built"
  );
  Ok(router)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
