//! Song model

use serde::{Deserialize, Serialize};

use super::ArtistRef;

/// A song in the library, with its artists joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Song id
    pub id: String,
    /// Song title
    pub title: String,
    /// Artists in credit order
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    /// Album id, if the song belongs to one
    #[serde(default)]
    pub album_id: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: i32,
    /// When the song was added (Unix millis)
    #[serde(default)]
    pub create_date: i64,
    /// Total listening time in millis
    #[serde(default)]
    pub total_play_time: i64,
    /// Whether the song is in the user's library
    #[serde(default = "default_true")]
    pub in_library: bool,
    /// Liked by the user
    #[serde(default)]
    pub liked: bool,
}

impl Song {
    /// Create a library song with zeroed stats
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artists: Vec::new(),
            album_id: None,
            duration: 0,
            create_date: 0,
            total_play_time: 0,
            in_library: true,
            liked: false,
        }
    }

    pub fn with_artists(mut self, artists: Vec<ArtistRef>) -> Self {
        self.artists = artists;
        self
    }

    /// Artist names concatenated in credit order with no separator
    pub fn artist_key(&self) -> String {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }

    /// Artist names for display
    pub fn artist(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn has_artist(&self, artist_id: &str) -> bool {
        self.artists.iter().any(|a| a.id == artist_id)
    }
}

fn default_true() -> bool {
    true
}
