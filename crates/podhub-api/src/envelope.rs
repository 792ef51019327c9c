//! The success envelope: `{"success": true, <key>: <payload>}`.

use axum::{
  Json,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A successful (200) response body.
#[derive(Debug, Clone)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
  /// `{"success": true, key: value}`.
  pub fn new(key: &str, value: impl Serialize) -> Result<Self, ApiError> {
    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(true));
    body.insert(key.to_owned(), serde_json::to_value(value)?);
    Ok(Self(body))
  }

  /// `{"success": true, "message": message}`.
  pub fn message(message: &str) -> Self {
    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(true));
    body.insert("message".to_owned(), Value::String(message.to_owned()));
    Self(body)
  }
}

impl IntoResponse for Envelope {
  fn into_response(self) -> Response { Json(Value::Object(self.0)).into_response() }
}
