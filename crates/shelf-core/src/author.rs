//! Author resource and its wire representations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  schema::{Field, FieldSchema, date_value, opt_date, opt_string, string_value},
  validation::{FieldErrors, Rules, Validate},
};

pub const NAME_MAX_LEN: usize = 150;
pub const GENRE_MAX_LEN: usize = 200;

/// A persisted author. `id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
  pub id:            Uuid,
  pub first_name:    String,
  pub last_name:     String,
  pub date_of_birth: NaiveDate,
  pub genre:         Option<String>,
}

/// The condensed author shape served by version 2.0 of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
  pub id:    Uuid,
  pub name:  String,
  pub genre: Option<String>,
}

impl From<&Author> for AuthorSummary {
  fn from(a: &Author) -> Self {
    AuthorSummary {
      id:    a.id,
      name:  format!("{} {}", a.first_name, a.last_name),
      genre: a.genre.clone(),
    }
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// The mutable subset of an [`Author`]; the body of `PUT` and the target of
/// `PATCH`.
///
/// Carries no id: the author being updated is always named by the request
/// path. Every field is optional on the wire; required-ness is enforced by
/// [`Validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForUpdate {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub genre:      Option<String>,
}

impl FieldSchema for AuthorForUpdate {
  const FIELDS: &'static [Field<Self>] = &[
    Field {
      name:     "firstName",
      required: true,
      get:      |a| string_value(&a.first_name),
      set:      |a, v| {
        a.first_name = opt_string(v)?;
        Ok(())
      },
    },
    Field {
      name:     "lastName",
      required: true,
      get:      |a| string_value(&a.last_name),
      set:      |a, v| {
        a.last_name = opt_string(v)?;
        Ok(())
      },
    },
    Field {
      name:     "genre",
      required: false,
      get:      |a| string_value(&a.genre),
      set:      |a, v| {
        a.genre = opt_string(v)?;
        Ok(())
      },
    },
  ];
}

impl Validate for AuthorForUpdate {
  fn validate(&self) -> FieldErrors {
    let mut rules = Rules::default();
    rules.required("firstName", self.first_name.as_deref());
    rules.max_len("firstName", self.first_name.as_deref(), NAME_MAX_LEN);
    rules.required("lastName", self.last_name.as_deref());
    rules.max_len("lastName", self.last_name.as_deref(), NAME_MAX_LEN);
    rules.max_len("genre", self.genre.as_deref(), GENRE_MAX_LEN);
    rules.finish()
  }
}

// ─── Creation ────────────────────────────────────────────────────────────────

/// Body of `POST /authors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreation {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub genre:         Option<String>,
}

impl FieldSchema for AuthorForCreation {
  const FIELDS: &'static [Field<Self>] = &[
    Field {
      name:     "firstName",
      required: true,
      get:      |a| string_value(&a.first_name),
      set:      |a, v| {
        a.first_name = opt_string(v)?;
        Ok(())
      },
    },
    Field {
      name:     "lastName",
      required: true,
      get:      |a| string_value(&a.last_name),
      set:      |a, v| {
        a.last_name = opt_string(v)?;
        Ok(())
      },
    },
    Field {
      name:     "dateOfBirth",
      required: true,
      get:      |a| date_value(&a.date_of_birth),
      set:      |a, v| {
        a.date_of_birth = opt_date(v)?;
        Ok(())
      },
    },
    Field {
      name:     "genre",
      required: false,
      get:      |a| string_value(&a.genre),
      set:      |a, v| {
        a.genre = opt_string(v)?;
        Ok(())
      },
    },
  ];
}

impl Validate for AuthorForCreation {
  fn validate(&self) -> FieldErrors {
    let mut rules = Rules::default();
    rules.required("firstName", self.first_name.as_deref());
    rules.max_len("firstName", self.first_name.as_deref(), NAME_MAX_LEN);
    rules.required("lastName", self.last_name.as_deref());
    rules.max_len("lastName", self.last_name.as_deref(), NAME_MAX_LEN);
    rules.present("dateOfBirth", self.date_of_birth.is_some());
    rules.max_len("genre", self.genre.as_deref(), GENRE_MAX_LEN);
    rules.finish()
  }
}
