//! Sample data for a fresh store.
//!
//! Loaded with `podhub --seed`. Nothing is written if the store already holds
//! any podcast, so the flag is safe to leave on.

use podhub_core::{
  Draft, Episode, NewEpisode, NewPodcast, NewSpeaker, Podcast, Speaker, store::Repository,
};
use podhub_store_sqlite::{Result, SqliteStore};

/// How many records a seeding run wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub podcasts: usize,
  pub speakers: usize,
  pub episodes: usize,
}

fn podcast(author: &str, name: &str, slug: &str) -> NewPodcast {
  NewPodcast {
    author:       author.to_owned(),
    name:         name.to_owned(),
    image_link:   format!("https://img.podhub.example/podcasts/{slug}.png"),
    podcast_link: format!("https://podhub.example/podcasts/{slug}"),
  }
}

fn speaker(name: &str, handle: &str) -> NewSpeaker {
  NewSpeaker {
    name:         name.to_owned(),
    image_link:   format!("https://img.podhub.example/speakers/{handle}.png"),
    twitter_link: format!("https://twitter.com/{handle}"),
    website_link: format!("https://{handle}.example"),
  }
}

/// `(title, topics, speaker index, podcast index)`
const EPISODES: &[(&str, &str, usize, usize)] = &[
  ("The Ledger", "Bitcoin, monetary history", 0, 0),
  ("Async All the Way Down", "Rust, async runtimes", 2, 1),
  ("Soil", "Ecology, regenerative farming", 1, 2),
  ("Proof of Work", "Bitcoin, energy markets", 1, 0),
];

/// Insert the sample set unless the store already has podcasts.
pub async fn sample_data(store: &SqliteStore) -> Result<SeedReport> {
  if !Repository::<Podcast>::list_all(store).await?.is_empty() {
    tracing::info!("store already has data; skipping seed");
    return Ok(SeedReport::default());
  }

  let mut podcasts: Vec<Podcast> = Vec::new();
  for p in [
    podcast("Robert Lane", "Signal and Noise", "signal-and-noise"),
    podcast("Priya Raman", "Systems Hour", "systems-hour"),
    podcast("Dana Okafor", "Field Notes", "field-notes"),
  ] {
    podcasts.push(store.create(Draft::<Podcast>::from(p)).await?);
  }

  let mut speakers: Vec<Speaker> = Vec::new();
  for s in [
    speaker("Michael Torres", "mtorres"),
    speaker("Hannah Schmidt", "hschmidt"),
    speaker("Kenji Sato", "ksato"),
  ] {
    speakers.push(store.create(Draft::<Speaker>::from(s)).await?);
  }

  for (n, (title, topics, s, p)) in EPISODES.iter().enumerate() {
    let episode = NewEpisode {
      title:        (*title).to_owned(),
      topics:       (*topics).to_owned(),
      podcast_link: format!("{}/episodes/{}", podcasts[*p].podcast_link, n + 1),
      speaker_id:   speakers[*s].id,
      podcast_id:   podcasts[*p].id,
    };
    store.create(Draft::<Episode>::from(episode)).await?;
  }

  let report = SeedReport {
    podcasts: podcasts.len(),
    speakers: speakers.len(),
    episodes: EPISODES.len(),
  };
  tracing::info!(?report, "seeded sample data");
  Ok(report)
}
