//! [`SqliteStore`]: the SQLite implementation of [`LibraryStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use shelf_core::{author::Author, book::Book, store::LibraryStore};

use crate::{
  Error, Result,
  encode::{
    AUTHOR_COLUMNS, BOOK_COLUMNS, RawAuthor, RawBook, encode_date, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shelf library store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── LibraryStore impl ───────────────────────────────────────────────────────

impl LibraryStore for SqliteStore {
  type Error = Error;

  // ── Authors ───────────────────────────────────────────────────────────────

  async fn get_author(&self, id: Uuid) -> Result<Option<Author>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAuthor> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {AUTHOR_COLUMNS} FROM authors WHERE author_id = ?1"),
            rusqlite::params![id_str],
            RawAuthor::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAuthor::into_author).transpose()
  }

  async fn list_authors(&self) -> Result<Vec<Author>> {
    let raws: Vec<RawAuthor> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY last_name, first_name"
        ))?;
        let rows = stmt
          .query_map([], RawAuthor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAuthor::into_author).collect()
  }

  async fn save_author(&self, author: Author) -> Result<()> {
    let id_str = encode_uuid(author.id);
    let dob_str = encode_date(author.date_of_birth);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO authors (author_id, first_name, last_name, date_of_birth, genre)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (author_id) DO UPDATE SET
             first_name    = excluded.first_name,
             last_name     = excluded.last_name,
             date_of_birth = excluded.date_of_birth,
             genre         = excluded.genre",
          rusqlite::params![
            id_str,
            author.first_name,
            author.last_name,
            dob_str,
            author.genre,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(author_id = %author.id, "saved author");
    Ok(())
  }

  // ── Books ─────────────────────────────────────────────────────────────────

  async fn list_books(&self, author_id: Uuid) -> Result<Vec<Book>> {
    let author_str = encode_uuid(author_id);

    let raws: Vec<RawBook> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BOOK_COLUMNS} FROM books WHERE author_id = ?1 ORDER BY title"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![author_str], RawBook::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBook::into_book).collect()
  }

  async fn get_book(&self, author_id: Uuid, book_id: Uuid) -> Result<Option<Book>> {
    let author_str = encode_uuid(author_id);
    let book_str = encode_uuid(book_id);

    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {BOOK_COLUMNS} FROM books WHERE author_id = ?1 AND book_id = ?2"
            ),
            rusqlite::params![author_str, book_str],
            RawBook::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn save_book(&self, book: Book) -> Result<()> {
    let book_str = encode_uuid(book.id);
    let author_str = encode_uuid(book.author_id);

    let author_exists: bool = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM authors WHERE author_id = ?1",
            rusqlite::params![author_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if exists {
          conn.execute(
            "INSERT INTO books (book_id, author_id, title, description)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (book_id) DO UPDATE SET
               author_id   = excluded.author_id,
               title       = excluded.title,
               description = excluded.description",
            rusqlite::params![book_str, author_str, book.title, book.description],
          )?;
        }
        Ok(exists)
      })
      .await?;

    if !author_exists {
      return Err(Error::AuthorNotFound(book.author_id));
    }
    tracing::debug!(book_id = %book.id, author_id = %book.author_id, "saved book");
    Ok(())
  }
}
