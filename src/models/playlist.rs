//! Playlist model

use serde::{Deserialize, Serialize};

/// A user playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist id
    pub id: String,
    /// Playlist name
    pub name: String,
    /// Number of songs
    #[serde(default)]
    pub song_count: i32,
    /// When the playlist was created (Unix millis)
    #[serde(default)]
    pub create_date: i64,
}

impl Playlist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            song_count: 0,
            create_date: 0,
        }
    }
}
