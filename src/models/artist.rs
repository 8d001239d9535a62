//! Artist model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An artist in the library, with cached remote metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Artist id
    pub id: String,
    /// Artist name
    pub name: String,
    /// Cached thumbnail, absent until metadata has been fetched
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Bookmarked by the user
    #[serde(default)]
    pub bookmarked: bool,
    /// When the artist was added (Unix millis)
    #[serde(default)]
    pub create_date: i64,
    /// When the cached metadata was last refreshed
    #[serde(default = "epoch")]
    pub last_update_time: DateTime<Utc>,
    /// Number of library songs by this artist
    #[serde(default)]
    pub song_count: i32,
    /// Total listening time in millis
    #[serde(default)]
    pub total_play_time: i64,
}

impl Artist {
    /// Create an artist that has never been refreshed
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail_url: None,
            bookmarked: false,
            create_date: 0,
            last_update_time: epoch(),
            song_count: 0,
            total_play_time: 0,
        }
    }

    /// Metadata is missing or was refreshed longer than `max_age` ago
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.thumbnail_url.is_none() || now - self.last_update_time > max_age
    }

    /// Merge a freshly fetched page into the cached record
    pub fn apply_page(&mut self, page: &ArtistPage, now: DateTime<Utc>) {
        if !page.name.is_empty() {
            self.name = page.name.clone();
        }
        if page.thumbnail_url.is_some() {
            self.thumbnail_url = page.thumbnail_url.clone();
        }
        self.last_update_time = now;
    }
}

/// Reference to an artist from a song or album credit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

impl ArtistRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Remote artist metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistPage {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}
