//! SQL schema for the podhub SQLite store.
//!
//! Executed once at connection startup. Column names and order follow the
//! field tables in `podhub_core`; `tests::schema_matches_field_tables` keeps
//! the two in step.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps ids monotonic and stops SQLite from handing out the
/// id of a deleted row again.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS podcasts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    author       TEXT NOT NULL,
    name         TEXT NOT NULL,
    image_link   TEXT NOT NULL,
    podcast_link TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS speakers (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    image_link   TEXT NOT NULL,
    twitter_link TEXT NOT NULL,
    website_link TEXT NOT NULL
);

-- Deleting a referenced podcast or speaker is refused by the store before
-- it gets here; the REFERENCES clauses are a backstop.
CREATE TABLE IF NOT EXISTS episodes (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    topics       TEXT NOT NULL,
    podcast_link TEXT NOT NULL,
    speaker_id   INTEGER NOT NULL REFERENCES speakers(id),
    podcast_id   INTEGER NOT NULL REFERENCES podcasts(id)
);

CREATE INDEX IF NOT EXISTS episodes_speaker_idx ON episodes(speaker_id);
CREATE INDEX IF NOT EXISTS episodes_podcast_idx ON episodes(podcast_id);

PRAGMA user_version = 1;
";
