//! The `LibraryStore` trait.
//!
//! Implemented by storage backends (e.g. `shelf-store-sqlite`). The API layer
//! depends on this abstraction, never on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{author::Author, book::Book};

/// Abstraction over the author/book persistence backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LibraryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Authors ───────────────────────────────────────────────────────────

  /// Retrieve an author by id. Returns `None` if not found.
  fn get_author(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Author>, Self::Error>> + Send + '_;

  /// List every author, ordered by last then first name.
  fn list_authors(
    &self,
  ) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  /// Insert `author`, or overwrite the stored author with the same id.
  fn save_author(
    &self,
    author: Author,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Books ─────────────────────────────────────────────────────────────

  /// List the books of one author, ordered by title.
  fn list_books(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  /// Retrieve a book, scoped to its author. Returns `None` if the book does
  /// not exist or belongs to someone else.
  fn get_book(
    &self,
    author_id: Uuid,
    book_id: Uuid,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_;

  /// Insert `book`, or overwrite the stored book with the same id. The
  /// owning author must exist.
  fn save_book(
    &self,
    book: Book,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
