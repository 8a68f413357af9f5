//! HTTP server wiring for Shelf.
//!
//! Holds the runtime configuration and assembles the top-level axum
//! [`Router`]: the versioned API nested under `/api`, wrapped in request
//! tracing.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use shelf_api::ApiConfig;
use shelf_core::{store::LibraryStore, version::AmbiguousRegistration};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SHELF__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Insert the sample authors and books into an empty store on startup.
  pub seed_sample_data: bool,
  pub api:              ApiConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8080,
      store_path:       PathBuf::from("~/.local/share/shelf/shelf.db"),
      seed_sample_data: false,
      api:              ApiConfig::default(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router for `store`.
pub fn app<S>(
  store: Arc<S>,
  config: &ServerConfig,
) -> Result<Router, AmbiguousRegistration>
where
  S: LibraryStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let api = shelf_api::api_router(store, &config.api)?;
  Ok(
    Router::new()
      .nest("/api", api)
      .layer(TraceLayer::new_for_http()),
  )
}
