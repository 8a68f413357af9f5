//! Handlers for `/authors/{author_id}/books` endpoints.
//!
//! These are version-neutral: every API version serves them.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/authors/{author_id}/books` | 404 if the author does not exist |
//! | `GET`  | `/authors/{author_id}/books/{book_id}` | 404 if either does not exist |
//! | `POST` | `/authors/{author_id}/books` | Body: [`BookForCreation`]; returns 201 |

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
use serde::Deserialize;
use serde_json::Value;
use shelf_core::{
  book::{Book, BookForCreation},
  mapping,
  schema::FieldSchema as _,
  store::LibraryStore,
  validation::{Validate as _, combine},
};
use uuid::Uuid;

use crate::{binding::Binding, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct BookPath {
  pub author_id: Uuid,
  pub book_id:   Uuid,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /authors/{author_id}/books`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  author_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Book>>, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut binding = Binding::default();
  let Some(Path(author_id)) = binding.param("authorId", author_id) else {
    return Err(binding.reject());
  };

  ensure_author(&*store, author_id).await?;
  let books = store
    .list_books(author_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(books))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /authors/{author_id}/books/{book_id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ids: Result<Path<BookPath>, PathRejection>,
) -> Result<Json<Book>, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut binding = Binding::default();
  let Some(Path(BookPath { author_id, book_id })) = binding.param("ids", ids) else {
    return Err(binding.reject());
  };

  ensure_author(&*store, author_id).await?;
  let book = store
    .get_book(author_id, book_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("book {book_id} not found")))?;
  Ok(Json(book))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /authors/{author_id}/books`, returning 201 + the stored [`Book`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  author_id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LibraryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut binding = Binding::default();
  let (Some(Path(author_id)), Some(body)) =
    (binding.param("authorId", author_id), binding.object(body))
  else {
    return Err(binding.reject());
  };

  let (input, bind_errors) = BookForCreation::from_object(&body);
  binding.verdict(combine(bind_errors, input.validate()))?;

  ensure_author(&*store, author_id).await?;
  let book = mapping::book_from_creation(Uuid::new_v4(), author_id, input)
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  store
    .save_book(book.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(book_id = %book.id, %author_id, "created book");
  Ok((StatusCode::CREATED, Json(book)))
}

async fn ensure_author<S>(store: &S, author_id: Uuid) -> Result<(), ApiError>
where
  S: LibraryStore,
{
  store
    .get_author(author_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(|_| ())
    .ok_or_else(|| ApiError::NotFound(format!("author {author_id} not found")))
}
