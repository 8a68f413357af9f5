//! SQL schema for the Shelf SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS authors (
    author_id     TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,   -- YYYY-MM-DD
    genre         TEXT
);

CREATE TABLE IF NOT EXISTS books (
    book_id     TEXT PRIMARY KEY,
    author_id   TEXT NOT NULL REFERENCES authors(author_id),
    title       TEXT NOT NULL,
    description TEXT
);

CREATE INDEX IF NOT EXISTS books_author_idx ON books(author_id);

PRAGMA user_version = 1;
";
