//! JSON REST API for podhub.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`Repository`] for all three entity types. TLS, CORS, and request tracing
//! are the caller's responsibility.
//!
//! | Method   | Path                | Operation |
//! |----------|---------------------|-----------|
//! | `GET`    | `/`                 | liveness |
//! | `GET`    | `/<plural>`         | list all |
//! | `POST`   | `/<plural>`         | search if the body has `search`, otherwise create |
//! | `GET`    | `/<plural>/{id}`    | get one |
//! | `PATCH`  | `/<plural>/{id}`    | update listed fields |
//! | `DELETE` | `/<plural>/{id}`    | delete |
//!
//! where `<plural>` is `podcasts`, `speakers`, or `episodes`.

pub mod envelope;
pub mod error;
pub mod health;
pub mod resources;

use std::sync::Arc;

use axum::{Router, routing::get};
use podhub_core::{Entity, Episode, Podcast, Speaker, store::Repository};

pub use envelope::Envelope;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: Repository<Podcast> + Repository<Speaker> + Repository<Episode> + 'static,
{
  Router::new()
    .route("/", get(health::handler))
    .merge(resource_routes::<S, Podcast>())
    .merge(resource_routes::<S, Speaker>())
    .merge(resource_routes::<S, Episode>())
    .fallback(not_found)
    .method_not_allowed_fallback(method_not_allowed)
    .with_state(store)
}

/// The five routes of one entity collection.
fn resource_routes<S, E>() -> Router<Arc<S>>
where
  S: Repository<E> + 'static,
  E: Entity,
{
  let collection = format!("/{}", E::KIND.plural());
  let member = format!("{collection}/{{id}}");

  Router::new()
    .route(
      &collection,
      get(resources::list::<S, E>).post(resources::post::<S, E>),
    )
    .route(
      &member,
      get(resources::get_one::<S, E>)
        .patch(resources::update::<S, E>)
        .delete(resources::delete_one::<S, E>),
    )
}

async fn not_found() -> ApiError { ApiError::NotFound }

async fn method_not_allowed() -> ApiError { ApiError::MethodNotAllowed }
