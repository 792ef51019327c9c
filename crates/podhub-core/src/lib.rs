//! Core types and trait definitions for the podhub resource API.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It defines the three entity types, their field tables, payload validation,
//! and the [`store::Repository`] trait that storage backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod episode;
pub mod error;
pub mod podcast;
pub mod speaker;
pub mod store;
pub mod validate;

pub use entity::{Entity, EntityKind, FieldKind, FieldSpec};
pub use episode::{Episode, NewEpisode};
pub use error::{Error, Result};
pub use podcast::{NewPodcast, Podcast};
pub use speaker::{NewSpeaker, Speaker};
pub use validate::{Changes, Draft, FieldValue, Problem, ValidationErrors};
