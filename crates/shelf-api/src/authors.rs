//! Handlers for `/authors` endpoints.
//!
//! | Method  | Path | Versions | Notes |
//! |---------|------|----------|-------|
//! | `GET`   | `/authors` | 1.0 | Full [`Author`] records |
//! | `GET`   | `/authors` | 2.0 | [`AuthorSummary`] records |
//! | `POST`  | `/authors` | 1.0, 2.0 | Body: [`AuthorForCreation`]; returns 201 |
//! | `GET`   | `/authors/{author_id}` | 1.0, 2.0 | 404 if not found |
//! | `PUT`   | `/authors/{author_id}` | 1.0, 2.0 | Body: [`AuthorForUpdate`] |
//! | `PATCH` | `/authors/{author_id}` | 1.0, 2.0 | Body: JSON-Patch operation array |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use shelf_core::{
  author::{Author, AuthorForCreation, AuthorForUpdate, AuthorSummary},
  mapping,
  patch::{self, PatchOperation},
  schema::FieldSchema as _,
  store::LibraryStore,
  validation::{Validate as _, combine},
};
use uuid::Uuid;

use crate::{binding::Binding, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /authors` (1.0)
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Author>>, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let authors = store
    .list_authors()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(authors))
}

/// `GET /authors` (2.0): condensed summaries.
pub async fn list_summaries<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<AuthorSummary>>, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let authors = store
    .list_authors()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(authors.iter().map(AuthorSummary::from).collect()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /authors/{author_id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Author>, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut binding = Binding::default();
  let Some(Path(id)) = binding.param("authorId", id) else {
    return Err(binding.reject());
  };
  let author = fetch(&*store, id).await?;
  Ok(Json(author))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /authors`, returning 201 + the stored [`Author`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut binding = Binding::default();
  let Some(body) = binding.object(body) else {
    return Err(binding.reject());
  };

  let (input, bind_errors) = AuthorForCreation::from_object(&body);
  binding.verdict(combine(bind_errors, input.validate()))?;

  let author = mapping::author_from_creation(Uuid::new_v4(), input)
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  store
    .save_author(author.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(author_id = %author.id, "created author");
  Ok((StatusCode::CREATED, Json(author)))
}

// ─── Full update ──────────────────────────────────────────────────────────────

/// `PUT /authors/{author_id}`: replaces every mutable field.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Author>, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut binding = Binding::default();
  let (Some(Path(id)), Some(body)) = (binding.param("authorId", id), binding.object(body))
  else {
    return Err(binding.reject());
  };

  let (input, bind_errors) = AuthorForUpdate::from_object(&body);
  binding.verdict(combine(bind_errors, input.validate()))?;

  let current = fetch(&*store, id).await?;
  save(&*store, input, current).await.map(Json)
}

// ─── Partial update ───────────────────────────────────────────────────────────

/// `PATCH /authors/{author_id}`, body: `[{"op":"replace","path":"/firstname","value":"..."}]`.
///
/// The patch is applied to the author's [`AuthorForUpdate`] projection and
/// the result validated before anything is saved.
pub async fn partial_update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> Result<Json<Author>, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut binding = Binding::default();
  let (Some(Path(id)), Some(operations)) =
    (binding.param("authorId", id), binding.body(body))
  else {
    return Err(binding.reject());
  };

  let current = fetch(&*store, id).await?;
  let patched = patch::apply(&mapping::to_update_request(&current), &operations)
    .inspect_err(|failure| tracing::warn!(author_id = %id, %failure, "patch rejected"))?;
  binding.verdict(patched.validate())?;

  save(&*store, patched, current).await.map(Json)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn fetch<S>(store: &S, id: Uuid) -> Result<Author, ApiError>
where
  S: LibraryStore,
{
  store
    .get_author(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("author {id} not found")))
}

async fn save<S>(
  store: &S,
  update: AuthorForUpdate,
  current: Author,
) -> Result<Author, ApiError>
where
  S: LibraryStore,
{
  let author =
    mapping::merge(update, current).map_err(|e| ApiError::Store(Box::new(e)))?;
  store
    .save_author(author.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(author_id = %author.id, "updated author");
  Ok(author)
}
