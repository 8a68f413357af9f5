//! Book resource and its creation payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  schema::{Field, FieldSchema, opt_string, string_value},
  validation::{FieldErrors, Rules, Validate},
};

pub const TITLE_MAX_LEN: usize = 150;
pub const DESCRIPTION_MAX_LEN: usize = 1500;

/// A book, always owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
  pub id:          Uuid,
  pub author_id:   Uuid,
  pub title:       String,
  pub description: Option<String>,
}

/// Body of `POST /authors/{author_id}/books`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForCreation {
  pub title:       Option<String>,
  pub description: Option<String>,
}

impl FieldSchema for BookForCreation {
  const FIELDS: &'static [Field<Self>] = &[
    Field {
      name:     "title",
      required: true,
      get:      |b| string_value(&b.title),
      set:      |b, v| {
        b.title = opt_string(v)?;
        Ok(())
      },
    },
    Field {
      name:     "description",
      required: false,
      get:      |b| string_value(&b.description),
      set:      |b, v| {
        b.description = opt_string(v)?;
        Ok(())
      },
    },
  ];
}

impl Validate for BookForCreation {
  fn validate(&self) -> FieldErrors {
    let mut rules = Rules::default();
    rules.required("title", self.title.as_deref());
    rules.max_len("title", self.title.as_deref(), TITLE_MAX_LEN);
    rules.max_len("description", self.description.as_deref(), DESCRIPTION_MAX_LEN);
    rules.finish()
  }
}
