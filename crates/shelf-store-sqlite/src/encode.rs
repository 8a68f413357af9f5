//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::NaiveDate;
use shelf_core::{author::Author, book::Book};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub const AUTHOR_COLUMNS: &str =
  "author_id, first_name, last_name, date_of_birth, genre";

pub const BOOK_COLUMNS: &str = "book_id, author_id, title, description";

/// Raw strings read directly from an `authors` row.
pub struct RawAuthor {
  pub author_id:     String,
  pub first_name:    String,
  pub last_name:     String,
  pub date_of_birth: String,
  pub genre:         Option<String>,
}

impl RawAuthor {
  /// Read a row selected with [`AUTHOR_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawAuthor {
      author_id:     row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      date_of_birth: row.get(3)?,
      genre:         row.get(4)?,
    })
  }

  pub fn into_author(self) -> Result<Author> {
    Ok(Author {
      id:            decode_uuid(&self.author_id)?,
      first_name:    self.first_name,
      last_name:     self.last_name,
      date_of_birth: decode_date(&self.date_of_birth)?,
      genre:         self.genre,
    })
  }
}

/// Raw strings read directly from a `books` row.
pub struct RawBook {
  pub book_id:     String,
  pub author_id:   String,
  pub title:       String,
  pub description: Option<String>,
}

impl RawBook {
  /// Read a row selected with [`BOOK_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawBook {
      book_id:     row.get(0)?,
      author_id:   row.get(1)?,
      title:       row.get(2)?,
      description: row.get(3)?,
    })
  }

  pub fn into_book(self) -> Result<Book> {
    Ok(Book {
      id:          decode_uuid(&self.book_id)?,
      author_id:   decode_uuid(&self.author_id)?,
      title:       self.title,
      description: self.description,
    })
  }
}
