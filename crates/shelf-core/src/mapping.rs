//! Conversions between persisted records and wire representations.
//!
//! Callers only reach these after validation has passed, so a missing
//! required field here is a programming error surfaced as
//! [`Error::MissingField`].

use uuid::Uuid;

use crate::{
  Error, Result,
  author::{Author, AuthorForCreation, AuthorForUpdate},
  book::{Book, BookForCreation},
};

/// Project the mutable fields of `author` into a patchable update request.
pub fn to_update_request(author: &Author) -> AuthorForUpdate {
  AuthorForUpdate {
    first_name: Some(author.first_name.clone()),
    last_name:  Some(author.last_name.clone()),
    genre:      author.genre.clone(),
  }
}

/// Write a validated update request onto `author`. The id is kept.
pub fn merge(update: AuthorForUpdate, author: Author) -> Result<Author> {
  Ok(Author {
    id:            author.id,
    first_name:    update.first_name.ok_or(Error::MissingField("firstName"))?,
    last_name:     update.last_name.ok_or(Error::MissingField("lastName"))?,
    date_of_birth: author.date_of_birth,
    genre:         update.genre,
  })
}

pub fn author_from_creation(id: Uuid, input: AuthorForCreation) -> Result<Author> {
  Ok(Author {
    id,
    first_name: input.first_name.ok_or(Error::MissingField("firstName"))?,
    last_name: input.last_name.ok_or(Error::MissingField("lastName"))?,
    date_of_birth: input
      .date_of_birth
      .ok_or(Error::MissingField("dateOfBirth"))?,
    genre: input.genre,
  })
}

pub fn book_from_creation(
  id: Uuid,
  author_id: Uuid,
  input: BookForCreation,
) -> Result<Book> {
  Ok(Book {
    id,
    author_id,
    title: input.title.ok_or(Error::MissingField("title"))?,
    description: input.description,
  })
}
