//! Serializable library contents, used to seed the in-memory stores

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Album, Artist, DownloadIndex, Playlist, Song};

/// Everything the in-memory collaborators hold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySnapshot {
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub playlists: Vec<Playlist>,
    pub downloads: DownloadIndex,
}

impl LibrarySnapshot {
    /// Read a library JSON file; a missing file is an empty library
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read library file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse library file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize library")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write library file {}", path.display()))
    }
}
