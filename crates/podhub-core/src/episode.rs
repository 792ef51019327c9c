//! Episode: a single recording, owned by one podcast and featuring one
//! speaker.
//!
//! Both foreign keys are checked against the store on create and on any
//! update that touches them; the field table only records which kind each
//! key points at.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Entity, EntityKind, FieldSpec},
  validate::{Draft, FieldValue},
};

pub const FIELDS: &[FieldSpec] = &[
  FieldSpec::text("title"),
  FieldSpec::text("topics"),
  FieldSpec::text("podcast_link"),
  FieldSpec::reference("speaker_id", EntityKind::Speaker),
  FieldSpec::reference("podcast_id", EntityKind::Podcast),
];

pub const SEARCH_FIELDS: &[&str] = &["topics"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
  pub id:           i64,
  pub title:        String,
  pub topics:       String,
  pub podcast_link: String,
  pub speaker_id:   i64,
  pub podcast_id:   i64,
}

impl Entity for Episode {
  const KIND: EntityKind = EntityKind::Episode;

  fn id(&self) -> i64 { self.id }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
  pub title:        String,
  pub topics:       String,
  pub podcast_link: String,
  pub speaker_id:   i64,
  pub podcast_id:   i64,
}

impl From<NewEpisode> for Draft<Episode> {
  fn from(e: NewEpisode) -> Self {
    Self::from_ordered(vec![
      FieldValue::Text(e.title),
      FieldValue::Text(e.topics),
      FieldValue::Text(e.podcast_link),
      FieldValue::Id(e.speaker_id),
      FieldValue::Id(e.podcast_id),
    ])
  }
}
