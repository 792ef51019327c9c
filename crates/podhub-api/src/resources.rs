//! Handlers for the `/podcasts`, `/speakers`, and `/episodes` collections.
//!
//! Every handler is generic over the entity type, so the three collections
//! share one implementation and one envelope shape:
//!
//! | Method   | Path            | Success body |
//! |----------|-----------------|--------------|
//! | `GET`    | `/<plural>`     | `{"success":true,"<plural>":[...]}` |
//! | `POST`   | `/<plural>`     | search: `{"success":true,"<plural>":[...]}`; create: `{"success":true,"<singular>":{...}}` |
//! | `GET`    | `/<plural>/{id}`| `{"success":true,"<singular>":{...}}`; 404 if not found |
//! | `PATCH`  | `/<plural>/{id}`| `{"success":true,"<singular>":{...}}`; 404 if not found |
//! | `DELETE` | `/<plural>/{id}`| `{"success":true,"deleted_id":id}`; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use podhub_core::{Changes, Draft, Entity, store::Repository};
use serde_json::Value;

use crate::{envelope::Envelope, error::ApiError};

/// Payload key that turns a `POST` into a search.
pub const SEARCH_KEY: &str = "search";

type IdSegment = Result<Path<i64>, PathRejection>;
type Body = Result<Json<Value>, JsonRejection>;

/// An id segment that is not an integer can never have been assigned.
fn id_of(segment: IdSegment) -> Result<i64, ApiError> {
  segment.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

fn payload_of(body: Body) -> Result<Value, ApiError> {
  body
    .map(|Json(value)| value)
    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /<plural>`
pub async fn list<S, E>(State(store): State<Arc<S>>) -> Result<Envelope, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let records = store.list_all().await.map_err(ApiError::from_store)?;
  Envelope::new(E::KIND.plural(), records)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /<plural>/{id}`
pub async fn get_one<S, E>(
  State(store): State<Arc<S>>,
  segment: IdSegment,
) -> Result<Envelope, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let id = id_of(segment)?;
  let record = store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound)?;
  Envelope::new(E::KIND.singular(), record)
}

// ─── Post: search or create ───────────────────────────────────────────────────

/// `POST /<plural>` dispatches on the payload shape. A body carrying
/// [`SEARCH_KEY`] is a search; anything else is a create.
pub async fn post<S, E>(
  State(store): State<Arc<S>>,
  body: Body,
) -> Result<Envelope, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let payload = payload_of(body)?;
  match payload.get(SEARCH_KEY) {
    Some(Value::String(term)) => search::<S, E>(&store, term).await,
    Some(_) => Err(ApiError::Unprocessable(format!(
      "field `{SEARCH_KEY}` must be a string"
    ))),
    None => create::<S, E>(&store, &payload).await,
  }
}

/// Records of `E` whose search fields contain `term`. Zero hits is still a
/// success.
pub async fn search<S, E>(store: &S, term: &str) -> Result<Envelope, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let records = store.search(term).await.map_err(ApiError::from_store)?;
  Envelope::new(E::KIND.plural(), records)
}

/// Validate `payload` as a complete `E` and persist it.
pub async fn create<S, E>(store: &S, payload: &Value) -> Result<Envelope, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let draft = Draft::<E>::from_payload(payload).map_err(ApiError::invalid)?;
  let record = store.create(draft).await.map_err(ApiError::from_store)?;
  Envelope::new(E::KIND.singular(), record)
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /<plural>/{id}` overwrites the fields present in the body.
pub async fn update<S, E>(
  State(store): State<Arc<S>>,
  segment: IdSegment,
  body: Body,
) -> Result<Envelope, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let id = id_of(segment)?;
  let changes = payload_of(body)
    .and_then(|payload| Changes::<E>::from_payload(&payload).map_err(ApiError::invalid));
  let changes = match changes {
    Ok(changes) => changes,
    Err(rejection) => {
      // A missing record outranks a bad body.
      store.get(id).await.map_err(ApiError::from_store)?.ok_or(ApiError::NotFound)?;
      return Err(rejection);
    }
  };
  let record = store
    .update(id, changes)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound)?;
  Envelope::new(E::KIND.singular(), record)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /<plural>/{id}`
pub async fn delete_one<S, E>(
  State(store): State<Arc<S>>,
  segment: IdSegment,
) -> Result<Envelope, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let id = id_of(segment)?;
  let deleted = store
    .delete(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound)?;
  Envelope::new("deleted_id", deleted)
}
