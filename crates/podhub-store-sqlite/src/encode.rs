//! Encoding and decoding helpers between validated field values, SQLite
//! columns, and record types.
//!
//! Rows are read column-by-column according to the entity's field table and
//! decoded into the record type through its serde representation, so one
//! decoder serves every entity.

use podhub_core::{Entity, EntityKind, FieldKind, FieldValue};
use rusqlite::types::Value;
use serde_json::{Map, Value as Json};

use crate::Result;

// ─── Values ──────────────────────────────────────────────────────────────────

pub fn encode_value(v: &FieldValue) -> Value {
  match v {
    FieldValue::Text(s) => Value::Text(s.clone()),
    FieldValue::Id(id) => Value::Integer(*id),
  }
}

// ─── SQL fragments ───────────────────────────────────────────────────────────

/// `id` followed by every field column, in table order.
pub fn select_columns(kind: EntityKind) -> String {
  std::iter::once("id")
    .chain(kind.fields().iter().map(|f| f.name))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Wrap `term` for a `LIKE ... ESCAPE '\'` substring match, escaping the
/// pattern metacharacters so the term is matched literally.
pub fn like_pattern(term: &str) -> String {
  let mut pattern = String::with_capacity(term.len() + 2);
  pattern.push('%');
  for c in term.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A row as read from SQLite, before conversion to a record type.
#[derive(Debug)]
pub struct RawRecord {
  pub kind:   EntityKind,
  pub id:     i64,
  pub values: Vec<FieldValue>,
}

impl RawRecord {
  /// Read a row selected with [`select_columns`].
  pub fn from_row(kind: EntityKind, row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let id = row.get(0)?;
    let values = kind
      .fields()
      .iter()
      .enumerate()
      .map(|(i, spec)| match spec.kind {
        FieldKind::Text => row.get(i + 1).map(FieldValue::Text),
        FieldKind::Reference(_) => row.get(i + 1).map(FieldValue::Id),
      })
      .collect::<rusqlite::Result<_>>()?;
    Ok(Self { kind, id, values })
  }

  pub fn into_entity<E: Entity>(self) -> Result<E> {
    debug_assert_eq!(self.kind, E::KIND);
    let mut object = Map::new();
    object.insert("id".to_owned(), Json::from(self.id));
    for (spec, value) in self.kind.fields().iter().zip(self.values) {
      let value = match value {
        FieldValue::Text(s) => Json::String(s),
        FieldValue::Id(id) => Json::from(id),
      };
      object.insert(spec.name.to_owned(), value);
    }
    Ok(serde_json::from_value(Json::Object(object))?)
  }
}
