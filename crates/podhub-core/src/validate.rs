//! Payload validation.
//!
//! A raw JSON payload is turned into either a [`Draft`] (every field present,
//! used by create) or a [`Changes`] set (any subset, used by update), or into
//! a [`ValidationErrors`] listing every problem found. Validation is a pure
//! function of the payload and the entity's field table; whether a foreign
//! key points at an existing row is checked later by the store.

use std::{fmt, marker::PhantomData};

use serde_json::{Map, Value};

use crate::entity::{Entity, EntityKind, FieldKind, FieldSpec};

// ─── Values ──────────────────────────────────────────────────────────────────

/// A validated field value, typed according to its [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(String),
  Id(i64),
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
  NotAnObject,
  Missing(&'static str),
  Null(&'static str),
  NotText(&'static str),
  NotAnId(&'static str),
  /// A foreign key naming a row that does not exist.
  Dangling {
    field:  &'static str,
    target: EntityKind,
    id:     i64,
  },
}

impl fmt::Display for Problem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Problem::NotAnObject => f.write_str("payload must be a JSON object"),
      Problem::Missing(field) => write!(f, "missing field `{field}`"),
      Problem::Null(field) => write!(f, "field `{field}` must not be null"),
      Problem::NotText(field) => write!(f, "field `{field}` must be a string"),
      Problem::NotAnId(field) => {
        write!(f, "field `{field}` must be an integer id")
      }
      Problem::Dangling { field, target, id } => {
        write!(f, "field `{field}` references {target} {id}, which does not exist")
      }
    }
  }
}

/// Every problem found in one payload, for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
  entity:   EntityKind,
  problems: Vec<Problem>,
}

impl ValidationErrors {
  pub fn new(entity: EntityKind, problems: Vec<Problem>) -> Self {
    Self { entity, problems }
  }

  pub fn entity(&self) -> EntityKind { self.entity }

  pub fn problems(&self) -> &[Problem] { &self.problems }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "invalid {}: ", self.entity)?;
    for (i, problem) in self.problems.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{problem}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Draft / Changes ─────────────────────────────────────────────────────────

/// A complete set of field values for a new record of `E`, in field-table
/// order.
#[derive(Debug, Clone)]
pub struct Draft<E> {
  values:  Vec<(&'static FieldSpec, FieldValue)>,
  _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Draft<E> {
  /// Validate a create payload. All fields are required.
  pub fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
    let values = collect(E::KIND, payload, Requirement::All)?;
    Ok(Self { values, _entity: PhantomData })
  }

  /// Pair `values` with the field table. Callers supply one value per field,
  /// in table order.
  pub(crate) fn from_ordered(values: Vec<FieldValue>) -> Self {
    debug_assert_eq!(values.len(), E::KIND.fields().len());
    let values = E::KIND.fields().iter().zip(values).collect();
    Self { values, _entity: PhantomData }
  }

  pub fn values(&self) -> &[(&'static FieldSpec, FieldValue)] { &self.values }

  pub fn get(&self, name: &str) -> Option<&FieldValue> { lookup(&self.values, name) }

  pub fn into_values(self) -> Vec<(&'static FieldSpec, FieldValue)> { self.values }
}

/// A subset of field values to overwrite on an existing record of `E`.
/// Fields not listed keep their stored value.
#[derive(Debug, Clone)]
pub struct Changes<E> {
  values:  Vec<(&'static FieldSpec, FieldValue)>,
  _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Changes<E> {
  /// Validate an update payload. Every field is optional, but a field that is
  /// present must be well-typed and non-null.
  pub fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
    let values = collect(E::KIND, payload, Requirement::Present)?;
    Ok(Self { values, _entity: PhantomData })
  }

  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  pub fn values(&self) -> &[(&'static FieldSpec, FieldValue)] { &self.values }

  pub fn get(&self, name: &str) -> Option<&FieldValue> { lookup(&self.values, name) }

  pub fn into_values(self) -> Vec<(&'static FieldSpec, FieldValue)> { self.values }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Requirement {
  All,
  Present,
}

fn collect(
  kind: EntityKind,
  payload: &Value,
  requirement: Requirement,
) -> Result<Vec<(&'static FieldSpec, FieldValue)>, ValidationErrors> {
  let Some(map) = payload.as_object() else {
    return Err(ValidationErrors::new(kind, vec![Problem::NotAnObject]));
  };

  let mut values = Vec::with_capacity(kind.fields().len());
  let mut problems = Vec::new();

  for spec in kind.fields() {
    match raw_value(map, spec) {
      None if requirement == Requirement::All => {
        problems.push(Problem::Missing(spec.name));
      }
      None => {}
      Some(Value::Null) => problems.push(Problem::Null(spec.name)),
      Some(raw) => match typed_value(spec, raw) {
        Ok(value) => values.push((spec, value)),
        Err(problem) => problems.push(problem),
      },
    }
  }

  if problems.is_empty() {
    Ok(values)
  } else {
    Err(ValidationErrors::new(kind, problems))
  }
}

fn raw_value<'a>(map: &'a Map<String, Value>, spec: &FieldSpec) -> Option<&'a Value> {
  map
    .get(spec.name)
    .or_else(|| spec.aliases.iter().find_map(|alias| map.get(*alias)))
}

fn typed_value(spec: &'static FieldSpec, raw: &Value) -> Result<FieldValue, Problem> {
  match spec.kind {
    FieldKind::Text => raw
      .as_str()
      .map(|s| FieldValue::Text(s.to_owned()))
      .ok_or(Problem::NotText(spec.name)),
    FieldKind::Reference(_) => {
      raw.as_i64().map(FieldValue::Id).ok_or(Problem::NotAnId(spec.name))
    }
  }
}

fn lookup<'a>(
  values: &'a [(&'static FieldSpec, FieldValue)],
  name: &str,
) -> Option<&'a FieldValue> {
  values.iter().find(|(spec, _)| spec.name == name).map(|(_, v)| v)
}
