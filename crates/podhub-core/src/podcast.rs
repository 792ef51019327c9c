//! Podcast: a show. Episodes point at the podcast they belong to.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Entity, EntityKind, FieldSpec},
  validate::{Draft, FieldValue},
};

pub const FIELDS: &[FieldSpec] = &[
  FieldSpec::text("author"),
  FieldSpec::text("name"),
  FieldSpec::text("image_link").with_aliases(&["image"]),
  FieldSpec::text("podcast_link"),
];

pub const SEARCH_FIELDS: &[&str] = &["author", "name"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
  pub id:           i64,
  pub author:       String,
  pub name:         String,
  pub image_link:   String,
  pub podcast_link: String,
}

impl Entity for Podcast {
  const KIND: EntityKind = EntityKind::Podcast;

  fn id(&self) -> i64 { self.id }
}

/// Typed input for creating a podcast without going through a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPodcast {
  pub author:       String,
  pub name:         String,
  pub image_link:   String,
  pub podcast_link: String,
}

impl From<NewPodcast> for Draft<Podcast> {
  fn from(p: NewPodcast) -> Self {
    Self::from_ordered(vec![
      FieldValue::Text(p.author),
      FieldValue::Text(p.name),
      FieldValue::Text(p.image_link),
      FieldValue::Text(p.podcast_link),
    ])
  }
}
