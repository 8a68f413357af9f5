//! Core types and request-correctness logic for the Shelf library API.
//!
//! Holds the resource model, the JSON-Patch engine, field validation and the
//! API version resolver. No HTTP or database code lives here; the `shelf-api`
//! and `shelf-store-sqlite` crates build on top of it.

pub mod author;
pub mod book;
pub mod error;
pub mod mapping;
pub mod patch;
pub mod schema;
pub mod store;
pub mod validation;
pub mod version;

pub use error::{Error, Result};
