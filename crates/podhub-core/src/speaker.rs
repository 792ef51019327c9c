//! Speaker: a guest or host who appears on episodes.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Entity, EntityKind, FieldSpec},
  validate::{Draft, FieldValue},
};

pub const FIELDS: &[FieldSpec] = &[
  FieldSpec::text("name"),
  FieldSpec::text("image_link"),
  FieldSpec::text("twitter_link"),
  FieldSpec::text("website_link"),
];

pub const SEARCH_FIELDS: &[&str] = &["name"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
  pub id:           i64,
  pub name:         String,
  pub image_link:   String,
  pub twitter_link: String,
  pub website_link: String,
}

impl Entity for Speaker {
  const KIND: EntityKind = EntityKind::Speaker;

  fn id(&self) -> i64 { self.id }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpeaker {
  pub name:         String,
  pub image_link:   String,
  pub twitter_link: String,
  pub website_link: String,
}

impl From<NewSpeaker> for Draft<Speaker> {
  fn from(s: NewSpeaker) -> Self {
    Self::from_ordered(vec![
      FieldValue::Text(s.name),
      FieldValue::Text(s.image_link),
      FieldValue::Text(s.twitter_link),
      FieldValue::Text(s.website_link),
    ])
  }
}
