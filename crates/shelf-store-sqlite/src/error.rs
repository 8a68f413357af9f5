//! Error type for `shelf-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// Attempted to save a book for an author that is not stored.
  #[error("author not found: {0}")]
  AuthorNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
