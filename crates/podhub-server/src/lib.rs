//! The podhub HTTP server: configuration, sample data, and the fully-layered
//! application router.

pub mod seed;

use std::{path::Path, sync::Arc};

use axum::Router;
use podhub_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered under
/// `PODHUB_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            std::path::PathBuf,
  /// Answer CORS preflights for any origin.
  pub cors_allow_any_origin: bool,
}

impl ServerConfig {
  /// Load from `path` (optional) and the environment, over built-in defaults.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080_i64)?
      .set_default("store_path", "podhub.db")?
      .set_default("cors_allow_any_origin", true)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PODHUB"))
      .build()?
      .try_deserialize()
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router wrapped in the transport layers the server runs with.
pub fn app(store: Arc<SqliteStore>, config: &ServerConfig) -> Router {
  let router = podhub_api::api_router(store).layer(TraceLayer::new_for_http());
  if config.cors_allow_any_origin {
    router.layer(CorsLayer::permissive())
  } else {
    router
  }
}
