//! Error type for `podhub-store-sqlite`.

use podhub_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request broke a data-model rule; the store was left untouched.
  #[error("{0}")]
  Core(#[from] podhub_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl StoreError for Error {
  fn rejection(&self) -> Option<&podhub_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      Error::Database(_) | Error::Json(_) | Error::Io(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
