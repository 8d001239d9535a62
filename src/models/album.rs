//! Album model

use serde::{Deserialize, Serialize};

use super::ArtistRef;

/// An album in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album id
    pub id: String,
    /// Album title
    pub title: String,
    /// Album artists
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    /// Release year
    #[serde(default)]
    pub year: Option<i32>,
    /// Number of songs
    #[serde(default)]
    pub song_count: i32,
    /// Total duration in seconds
    #[serde(default)]
    pub duration: i32,
    /// When the album was added (Unix millis)
    #[serde(default)]
    pub create_date: i64,
    /// Total listening time in millis
    #[serde(default)]
    pub total_play_time: i64,
}

impl Album {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artists: Vec::new(),
            year: None,
            song_count: 0,
            duration: 0,
            create_date: 0,
            total_play_time: 0,
        }
    }

    /// Artist names concatenated in credit order
    pub fn artist_key(&self) -> String {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }
}
