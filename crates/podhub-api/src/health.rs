//! Handler for `GET /`.

use crate::envelope::Envelope;

/// `GET /`: liveness only. Does not touch the store.
pub async fn handler() -> Envelope { Envelope::message("Healthy") }
