//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use podhub_core::{
  Changes, Draft, EntityKind, Episode, NewEpisode, NewPodcast, NewSpeaker, Podcast,
  Problem, Speaker, store::{Repository, StoreError},
};
use serde_json::json;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_podcast(author: &str, name: &str) -> Draft<Podcast> {
  NewPodcast {
    author:       author.into(),
    name:         name.into(),
    image_link:   "https://img.example/cover.png".into(),
    podcast_link: "https://pod.example/feed".into(),
  }
  .into()
}

fn new_speaker(name: &str) -> Draft<Speaker> {
  NewSpeaker {
    name:         name.into(),
    image_link:   "https://img.example/face.png".into(),
    twitter_link: "https://twitter.example/someone".into(),
    website_link: "https://someone.example".into(),
  }
  .into()
}

fn new_episode(topics: &str, speaker_id: i64, podcast_id: i64) -> Draft<Episode> {
  NewEpisode {
    title: "Episode".into(),
    topics: topics.into(),
    podcast_link: "https://pod.example/ep".into(),
    speaker_id,
    podcast_id,
  }
  .into()
}

/// A podcast and a speaker to hang episodes off.
async fn fixtures(s: &SqliteStore) -> (Podcast, Speaker) {
  let podcast = s.create(new_podcast("Robert Host", "The Show")).await.unwrap();
  let speaker = s.create(new_speaker("Michael Guest")).await.unwrap();
  (podcast, speaker)
}

fn rejection(e: &Error) -> &podhub_core::Error {
  e.rejection().expect("expected a domain rejection")
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_matches_field_tables() {
  let s = store().await;

  for kind in EntityKind::ALL {
    let table = kind.table();
    let columns: Vec<String> = s
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let rows = stmt
          .query_map([], |row| row.get::<_, String>(1))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .unwrap();

    let expected: Vec<&str> = std::iter::once("id")
      .chain(kind.fields().iter().map(|f| f.name))
      .collect();
    assert_eq!(columns, expected, "columns of {table}");
  }
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_creates_missing_parent_directories() {
  let root = std::env::temp_dir().join(format!("podhub-open-{}", std::process::id()));
  let path = root.join("nested/data/podhub.db");
  let _ = std::fs::remove_dir_all(&root);

  let s = SqliteStore::open(&path).await.unwrap();
  let created = s.create(new_podcast("Robert", "On Disk")).await.unwrap();
  drop(s);

  let reopened = SqliteStore::open(&path).await.unwrap();
  let fetched = Repository::<Podcast>::get(&reopened, created.id).await.unwrap();
  assert_eq!(fetched.map(|p| p.name), Some("On Disk".to_owned()));

  drop(reopened);
  std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn create_and_get_podcast() {
  let s = store().await;

  let created = s.create(new_podcast("Test author", "Test Name")).await.unwrap();
  assert_eq!(created.name, "Test Name");
  assert_eq!(created.author, "Test author");

  let fetched = Repository::<Podcast>::get(&s, created.id).await.unwrap();
  assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn create_from_payload_keeps_every_submitted_field() {
  let s = store().await;

  let payload = json!({
    "name":         "Ada",
    "image_link":   "image link",
    "twitter_link": "twitter link",
    "website_link": "weblink",
  });
  let created: Speaker = s
    .create(Draft::<Speaker>::from_payload(&payload).unwrap())
    .await
    .unwrap();

  let fetched = Repository::<Speaker>::get(&s, created.id).await.unwrap().unwrap();
  let as_json = serde_json::to_value(&fetched).unwrap();
  for (key, value) in payload.as_object().unwrap() {
    assert_eq!(&as_json[key], value, "field {key}");
  }
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(Repository::<Podcast>::get(&s, 12345).await.unwrap().is_none());
  assert!(Repository::<Speaker>::get(&s, 12345).await.unwrap().is_none());
  assert!(Repository::<Episode>::get(&s, 12345).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_are_never_reused() {
  let s = store().await;

  let first = s.create(new_speaker("One")).await.unwrap();
  let second = s.create(new_speaker("Two")).await.unwrap();
  assert!(second.id > first.id);

  Repository::<Speaker>::delete(&s, second.id).await.unwrap();
  let third = s.create(new_speaker("Three")).await.unwrap();
  assert!(third.id > second.id);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
  let s = store().await;

  let handles: Vec<_> = (0..16)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move { s.create(new_speaker(&format!("Speaker {i}"))).await })
    })
    .collect();

  let mut ids = HashSet::new();
  for handle in handles {
    let speaker = handle.await.unwrap().unwrap();
    assert!(ids.insert(speaker.id), "duplicate id {}", speaker.id);
  }

  let all = Repository::<Speaker>::list_all(&s).await.unwrap();
  assert_eq!(all.len(), 16);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_all_empty_then_populated() {
  let s = store().await;
  assert!(Repository::<Podcast>::list_all(&s).await.unwrap().is_empty());

  s.create(new_podcast("A", "First")).await.unwrap();
  s.create(new_podcast("B", "Second")).await.unwrap();

  let all = Repository::<Podcast>::list_all(&s).await.unwrap();
  let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, ["First", "Second"]);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn podcast_search_matches_author_or_name_case_insensitively() {
  let s = store().await;
  s.create(new_podcast("Robert Smith", "Deep Dives")).await.unwrap();
  s.create(new_podcast("Jane Doe", "robert's corner")).await.unwrap();
  s.create(new_podcast("Someone", "Unrelated")).await.unwrap();

  let hits = Repository::<Podcast>::search(&s, "ROBERT").await.unwrap();
  assert_eq!(hits.len(), 2);

  let none = Repository::<Podcast>::search(&s, "nobody").await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn speaker_search_only_looks_at_name() {
  let s = store().await;
  s.create(new_speaker("Michael")).await.unwrap();

  assert_eq!(Repository::<Speaker>::search(&s, "mich").await.unwrap().len(), 1);
  // The fixture website contains "someone", which must not match.
  assert!(Repository::<Speaker>::search(&s, "someone").await.unwrap().is_empty());
}

#[tokio::test]
async fn episode_search_matches_topics() {
  let s = store().await;
  let (podcast, speaker) = fixtures(&s).await;
  s.create(new_episode("Bitcoin and money", speaker.id, podcast.id)).await.unwrap();
  s.create(new_episode("Gardening", speaker.id, podcast.id)).await.unwrap();

  let hits = Repository::<Episode>::search(&s, "bitcoin").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].topics, "Bitcoin and money");
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
  let s = store().await;
  s.create(new_speaker("Émile Zola")).await.unwrap();
  s.create(new_speaker("Øystein Ström")).await.unwrap();

  for term in ["zola", "émile", "ÉMILE", "STRÖM"] {
    let hits = Repository::<Speaker>::search(&s, term).await.unwrap();
    assert_eq!(hits.len(), 1, "{term}");
  }
  let hits = Repository::<Speaker>::search(&s, "øy").await.unwrap();
  assert_eq!(hits[0].name, "Øystein Ström");
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.create(new_podcast("A", "100% Pure")).await.unwrap();
  s.create(new_podcast("B", "1000 Days")).await.unwrap();

  let hits = Repository::<Podcast>::search(&s, "100%").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "100% Pure");

  assert!(Repository::<Podcast>::search(&s, "_").await.unwrap().is_empty());
}

// ─── Episode references ──────────────────────────────────────────────────────

#[tokio::test]
async fn episode_with_existing_references_is_created() {
  let s = store().await;
  let (podcast, speaker) = fixtures(&s).await;

  let episode = s.create(new_episode("Intro", speaker.id, podcast.id)).await.unwrap();
  assert_eq!(episode.speaker_id, speaker.id);
  assert_eq!(episode.podcast_id, podcast.id);
}

#[tokio::test]
async fn episode_with_dangling_speaker_is_rejected() {
  let s = store().await;
  let (podcast, _) = fixtures(&s).await;

  let err = s.create(new_episode("Intro", 9999, podcast.id)).await.unwrap_err();
  match rejection(&err) {
    podhub_core::Error::Invalid(errors) => {
      assert_eq!(errors.problems(), &[Problem::Dangling {
        field:  "speaker_id",
        target: EntityKind::Speaker,
        id:     9999,
      }]);
    }
    other => panic!("unexpected rejection: {other:?}"),
  }

  assert!(Repository::<Episode>::list_all(&s).await.unwrap().is_empty());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_listed_fields_only() {
  let s = store().await;
  let speaker = s.create(new_speaker("Ada")).await.unwrap();

  let changes = Changes::<Speaker>::from_payload(&json!({
    "website_link": "https://ada.example/new",
  }))
  .unwrap();
  let updated = s.update(speaker.id, changes).await.unwrap().unwrap();

  assert_eq!(updated.website_link, "https://ada.example/new");
  assert_eq!(updated.name, speaker.name);
  assert_eq!(updated.image_link, speaker.image_link);
  assert_eq!(updated.twitter_link, speaker.twitter_link);

  let fetched = Repository::<Speaker>::get(&s, speaker.id).await.unwrap();
  assert_eq!(fetched, Some(updated));
}

#[tokio::test]
async fn update_with_no_changes_returns_stored_record() {
  let s = store().await;
  let podcast = s.create(new_podcast("A", "Same")).await.unwrap();

  let changes = Changes::<Podcast>::from_payload(&json!({})).unwrap();
  let updated = s.update(podcast.id, changes).await.unwrap();
  assert_eq!(updated, Some(podcast));
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let changes = Changes::<Podcast>::from_payload(&json!({ "name": "x" })).unwrap();
  assert!(s.update(12345, changes).await.unwrap().is_none());
}

#[tokio::test]
async fn update_with_dangling_reference_leaves_record_untouched() {
  let s = store().await;
  let (podcast, speaker) = fixtures(&s).await;
  let episode = s.create(new_episode("Intro", speaker.id, podcast.id)).await.unwrap();

  let changes = Changes::<Episode>::from_payload(&json!({
    "title":      "Renamed",
    "podcast_id": 4242,
  }))
  .unwrap();
  let err = s.update(episode.id, changes).await.unwrap_err();
  assert!(matches!(rejection(&err), podhub_core::Error::Invalid(_)));

  let fetched = Repository::<Episode>::get(&s, episode.id).await.unwrap();
  assert_eq!(fetched, Some(episode));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_returns_id_then_get_returns_none() {
  let s = store().await;
  let podcast = s.create(new_podcast("A", "Doomed")).await.unwrap();

  let deleted = Repository::<Podcast>::delete(&s, podcast.id).await.unwrap();
  assert_eq!(deleted, Some(podcast.id));
  assert!(Repository::<Podcast>::get(&s, podcast.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_returns_none() {
  let s = store().await;
  assert!(Repository::<Episode>::delete(&s, 12345).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_of_referenced_podcast_is_refused() {
  let s = store().await;
  let (podcast, speaker) = fixtures(&s).await;
  let episode = s.create(new_episode("Intro", speaker.id, podcast.id)).await.unwrap();

  let err = Repository::<Podcast>::delete(&s, podcast.id).await.unwrap_err();
  assert_eq!(rejection(&err), &podhub_core::Error::InUse {
    kind:          EntityKind::Podcast,
    id:            podcast.id,
    referenced_by: EntityKind::Episode,
    count:         1,
  });
  assert!(Repository::<Podcast>::get(&s, podcast.id).await.unwrap().is_some());

  Repository::<Episode>::delete(&s, episode.id).await.unwrap();
  let deleted = Repository::<Podcast>::delete(&s, podcast.id).await.unwrap();
  assert_eq!(deleted, Some(podcast.id));
}

#[tokio::test]
async fn delete_of_referenced_speaker_is_refused() {
  let s = store().await;
  let (podcast, speaker) = fixtures(&s).await;
  s.create(new_episode("Intro", speaker.id, podcast.id)).await.unwrap();

  let err = Repository::<Speaker>::delete(&s, speaker.id).await.unwrap_err();
  assert!(matches!(
    rejection(&err),
    podhub_core::Error::InUse { referenced_by: EntityKind::Episode, .. }
  ));
}
