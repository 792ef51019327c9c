//! Error types for `podhub-core`.
//!
//! These are domain rejections: the request was understood but breaks a rule
//! of the data model. Backends wrap them in their own error types and expose
//! them through [`StoreError::rejection`](crate::store::StoreError::rejection).

use thiserror::Error;

use crate::{entity::EntityKind, validate::ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("{0}")]
  Invalid(ValidationErrors),

  /// A podcast or speaker cannot be deleted while episodes still point at it.
  #[error("{kind} {id} is still referenced by {count} {}", .referenced_by.plural())]
  InUse {
    kind:          EntityKind,
    id:            i64,
    referenced_by: EntityKind,
    count:         u64,
  },
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Error::Invalid(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
