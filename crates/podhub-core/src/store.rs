//! The `Repository` trait and its error contract.
//!
//! The trait is implemented by storage backends (e.g. `podhub-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  entity::Entity,
  validate::{Changes, Draft},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Implemented by backend error types.
///
/// A failure is either a domain rejection (the caller asked for something the
/// data model forbids) or a store fault (the backend could not do its job).
/// Callers branch on [`rejection`](StoreError::rejection) and never treat a
/// fault as "no such row".
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The rule the request broke, or `None` for a store fault.
  fn rejection(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Data access for one entity type.
///
/// A missing row is an expected outcome, reported as `Ok(None)`. Backends
/// hold no cross-call cached state; every call reads or writes the store, and
/// each write happens atomically.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Repository<E: Entity>: Send + Sync {
  type Error: StoreError;

  /// Every record of `E`. An empty store is an empty vector, not an error.
  fn list_all(&self) -> impl Future<Output = Result<Vec<E>, Self::Error>> + Send + '_;

  /// Exact lookup by primary key.
  fn get(&self, id: i64) -> impl Future<Output = Result<Option<E>, Self::Error>> + Send + '_;

  /// Records whose search fields contain `term`, case-insensitively.
  /// Zero matches is a successful, empty result.
  fn search<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<E>, Self::Error>> + Send + 'a;

  /// Persist a new record and return it with its assigned `id`.
  ///
  /// Fails with [`Error::Invalid`](crate::Error::Invalid) if a foreign key
  /// names a row that does not exist.
  fn create(&self, draft: Draft<E>) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Overwrite the listed fields of record `id` and return the result.
  /// Returns `None` if there is no such record.
  fn update(
    &self,
    id: i64,
    changes: Changes<E>,
  ) -> impl Future<Output = Result<Option<E>, Self::Error>> + Send + '_;

  /// Remove record `id` and return its id. Returns `None` if there is no such
  /// record.
  ///
  /// Fails with [`Error::InUse`](crate::Error::InUse) if other records still
  /// reference it.
  fn delete(&self, id: i64) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;
}
