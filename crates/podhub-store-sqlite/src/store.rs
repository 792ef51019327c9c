//! [`SqliteStore`]: the SQLite implementation of [`Repository`].
//!
//! One generic implementation serves all three entity types; the SQL is built
//! from the entity's field table. Table and column names only ever come from
//! those static tables, never from request data.

use std::path::Path;

use rusqlite::{
  OptionalExtension as _, functions::FunctionFlags, params, params_from_iter, types::Value,
};

use podhub_core::{
  Changes, Draft, Entity, EntityKind, FieldKind, FieldSpec, FieldValue, Problem,
  ValidationErrors, store::Repository,
};

use crate::{
  Error, Result,
  encode::{RawRecord, encode_value, like_pattern, select_columns},
  schema::SCHEMA,
};

/// Scalar SQL function lowercasing text with Unicode rules. SQLite's own
/// `LIKE` only folds ASCII.
const FOLD_FN: &str = "podhub_fold";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A podhub store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Each call
/// borrows the connection for the duration of one operation, and the
/// connection thread runs operations one at a time, so concurrent callers see
/// a linearised history.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.create_scalar_function(
          FOLD_FN,
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a read returning many rows of `kind`.
  async fn query_records<E: Entity>(&self, sql: String, params: Vec<Value>) -> Result<Vec<E>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(params), |row| RawRecord::from_row(E::KIND, row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_entity).collect()
  }
}

// ─── Transaction helpers ─────────────────────────────────────────────────────

/// Result of a write to an existing row, decided inside the transaction.
enum Outcome<T> {
  Done(T),
  Missing,
  Rejected(podhub_core::Error),
}

fn exists(conn: &rusqlite::Connection, kind: EntityKind, id: i64) -> rusqlite::Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE id = ?1", kind.table());
  Ok(conn.query_row(&sql, params![id], |_| Ok(())).optional()?.is_some())
}

fn fetch(
  conn: &rusqlite::Connection,
  kind: EntityKind,
  id: i64,
) -> rusqlite::Result<Option<RawRecord>> {
  let sql = format!(
    "SELECT {} FROM {} WHERE id = ?1",
    select_columns(kind),
    kind.table()
  );
  conn
    .query_row(&sql, params![id], |row| RawRecord::from_row(kind, row))
    .optional()
}

/// Every foreign key in `values` that names a row which does not exist.
fn dangling_references(
  conn: &rusqlite::Connection,
  values: &[(&'static FieldSpec, FieldValue)],
) -> rusqlite::Result<Vec<Problem>> {
  let mut problems = Vec::new();
  for (spec, value) in values {
    if let (FieldKind::Reference(target), FieldValue::Id(id)) = (spec.kind, value)
      && !exists(conn, target, *id)?
    {
      problems.push(Problem::Dangling { field: spec.name, target, id: *id });
    }
  }
  Ok(problems)
}

fn placeholders(n: usize) -> String {
  (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl<E: Entity> Repository<E> for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_all(&self) -> Result<Vec<E>> {
    let sql = format!(
      "SELECT {} FROM {} ORDER BY id",
      select_columns(E::KIND),
      E::KIND.table()
    );
    self.query_records(sql, Vec::new()).await
  }

  async fn get(&self, id: i64) -> Result<Option<E>> {
    let raw = self.conn.call(move |conn| Ok(fetch(conn, E::KIND, id)?)).await?;
    raw.map(RawRecord::into_entity).transpose()
  }

  async fn search(&self, term: &str) -> Result<Vec<E>> {
    let conds = E::KIND
      .search_fields()
      .iter()
      .map(|field| format!("{FOLD_FN}({field}) LIKE ?1 ESCAPE '\\'"))
      .collect::<Vec<_>>()
      .join(" OR ");
    let sql = format!(
      "SELECT {} FROM {} WHERE {conds} ORDER BY id",
      select_columns(E::KIND),
      E::KIND.table()
    );
    self.query_records(sql, vec![Value::Text(like_pattern(&term.to_lowercase()))]).await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, draft: Draft<E>) -> Result<E> {
    let kind = E::KIND;
    let values = draft.into_values();

    let outcome: std::result::Result<RawRecord, podhub_core::Error> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let problems = dangling_references(&tx, &values)?;
        if !problems.is_empty() {
          return Ok(Err(ValidationErrors::new(kind, problems).into()));
        }

        let columns = values.iter().map(|(f, _)| f.name).collect::<Vec<_>>().join(", ");
        let sql = format!(
          "INSERT INTO {} ({columns}) VALUES ({})",
          kind.table(),
          placeholders(values.len())
        );
        tx.execute(&sql, params_from_iter(values.iter().map(|(_, v)| encode_value(v))))?;

        let id = tx.last_insert_rowid();
        let raw = fetch(&tx, kind, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    let raw = outcome?;
    tracing::debug!(kind = %kind, id = raw.id, "created record");
    raw.into_entity()
  }

  async fn update(&self, id: i64, changes: Changes<E>) -> Result<Option<E>> {
    let kind = E::KIND;
    let values = changes.into_values();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !exists(&tx, kind, id)? {
          return Ok(Outcome::Missing);
        }

        let problems = dangling_references(&tx, &values)?;
        if !problems.is_empty() {
          return Ok(Outcome::Rejected(ValidationErrors::new(kind, problems).into()));
        }

        if !values.is_empty() {
          let assignments = values
            .iter()
            .enumerate()
            .map(|(i, (f, _))| format!("{} = ?{}", f.name, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
          let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{}",
            kind.table(),
            values.len() + 1
          );
          let params = values
            .iter()
            .map(|(_, v)| encode_value(v))
            .chain(std::iter::once(Value::Integer(id)));
          tx.execute(&sql, params_from_iter(params))?;
        }

        let raw = fetch(&tx, kind, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(Outcome::Done(raw))
      })
      .await?;

    match outcome {
      Outcome::Done(raw) => raw.into_entity().map(Some),
      Outcome::Missing => Ok(None),
      Outcome::Rejected(e) => Err(Error::Core(e)),
    }
  }

  async fn delete(&self, id: i64) -> Result<Option<i64>> {
    let kind = E::KIND;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !exists(&tx, kind, id)? {
          return Ok(Outcome::Missing);
        }

        for (referrer, field) in kind.referenced_by() {
          let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1",
            referrer.table(),
            field.name
          );
          let count: i64 = tx.query_row(&sql, params![id], |r| r.get(0))?;
          if count > 0 {
            return Ok(Outcome::Rejected(podhub_core::Error::InUse {
              kind,
              id,
              referenced_by: referrer,
              count: count as u64,
            }));
          }
        }

        tx.execute(&format!("DELETE FROM {} WHERE id = ?1", kind.table()), params![id])?;
        tx.commit()?;
        Ok(Outcome::Done(id))
      })
      .await?;

    match outcome {
      Outcome::Done(id) => {
        tracing::debug!(kind = %kind, id, "deleted record");
        Ok(Some(id))
      }
      Outcome::Missing => Ok(None),
      Outcome::Rejected(e) => Err(Error::Core(e)),
    }
  }
}
