//! Entity kinds and the static field tables that describe them.
//!
//! Every entity type has a fixed, ordered list of [`FieldSpec`]s. Validation,
//! SQL generation, and row decoding are all driven by that table, so the three
//! entity types share one code path everywhere above the record structs.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{episode, podcast, speaker};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// One of the three entity collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Podcast,
  Speaker,
  Episode,
}

impl EntityKind {
  pub const ALL: [EntityKind; 3] =
    [EntityKind::Podcast, EntityKind::Speaker, EntityKind::Episode];

  /// Envelope key for single-record responses.
  pub fn singular(self) -> &'static str {
    match self {
      EntityKind::Podcast => "podcast",
      EntityKind::Speaker => "speaker",
      EntityKind::Episode => "episode",
    }
  }

  /// Envelope key for collection responses; also the route segment.
  pub fn plural(self) -> &'static str {
    match self {
      EntityKind::Podcast => "podcasts",
      EntityKind::Speaker => "speakers",
      EntityKind::Episode => "episodes",
    }
  }

  /// Backing table name.
  pub fn table(self) -> &'static str { self.plural() }

  /// The ordered field table, excluding the store-assigned `id`.
  pub fn fields(self) -> &'static [FieldSpec] {
    match self {
      EntityKind::Podcast => podcast::FIELDS,
      EntityKind::Speaker => speaker::FIELDS,
      EntityKind::Episode => episode::FIELDS,
    }
  }

  /// Text fields matched by `search`. A record matches if any of them does.
  pub fn search_fields(self) -> &'static [&'static str] {
    match self {
      EntityKind::Podcast => podcast::SEARCH_FIELDS,
      EntityKind::Speaker => speaker::SEARCH_FIELDS,
      EntityKind::Episode => episode::SEARCH_FIELDS,
    }
  }

  /// Every `(kind, field)` pair whose field is a foreign key onto `self`.
  pub fn referenced_by(self) -> impl Iterator<Item = (EntityKind, &'static FieldSpec)> {
    EntityKind::ALL.into_iter().flat_map(move |kind| {
      kind
        .fields()
        .iter()
        .filter(move |f| f.kind == FieldKind::Reference(self))
        .map(move |f| (kind, f))
    })
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.singular())
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// A required string column.
  Text,
  /// A required integer column holding the `id` of a row of another kind.
  Reference(EntityKind),
}

/// One entry of an entity's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  /// Canonical name, used for the column and the serialised record.
  pub name:    &'static str,
  pub kind:    FieldKind,
  /// Alternative payload keys accepted on input. The canonical name wins when
  /// both are present.
  pub aliases: &'static [&'static str],
}

impl FieldSpec {
  pub const fn text(name: &'static str) -> Self {
    Self { name, kind: FieldKind::Text, aliases: &[] }
  }

  pub const fn reference(name: &'static str, target: EntityKind) -> Self {
    Self { name, kind: FieldKind::Reference(target), aliases: &[] }
  }

  pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
    Self { aliases, ..self }
  }
}

// ─── Entity trait ────────────────────────────────────────────────────────────

/// A persisted record type.
///
/// The serialised form of an implementor must be a flat JSON object holding
/// `id` plus exactly the fields of `KIND.fields()` under their canonical
/// names; backends rely on this to decode rows generically.
pub trait Entity:
  Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
  const KIND: EntityKind;

  fn id(&self) -> i64;
}
