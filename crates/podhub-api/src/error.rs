//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered as `{"success": false, "message": "..."}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use podhub_core::{ValidationErrors, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("resource not found")]
  NotFound,

  #[error("method not allowed")]
  MethodNotAllowed,

  /// The request body could not be read as JSON.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("{0}")]
  Unprocessable(String),

  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl ApiError {
  /// Split a backend failure into a client rejection or a store fault.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.rejection() {
      Some(podhub_core::Error::Invalid(errors)) => {
        tracing::debug!(%errors, "rejected invalid payload");
        ApiError::Unprocessable(errors.to_string())
      }
      Some(rejection @ podhub_core::Error::InUse { .. }) => {
        tracing::debug!(%rejection, "rejected delete");
        ApiError::Conflict(rejection.to_string())
      }
      None => ApiError::Store(Box::new(e)),
    }
  }

  pub fn invalid(errors: ValidationErrors) -> Self {
    tracing::debug!(%errors, "rejected invalid payload");
    ApiError::Unprocessable(errors.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound => StatusCode::NOT_FOUND,
      ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Store(_) | ApiError::Serialization(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    // Internal details stay in the log.
    let message = if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
      "internal server error".to_owned()
    } else {
      self.to_string()
    };

    (status, Json(json!({ "success": false, "message": message }))).into_response()
  }
}
