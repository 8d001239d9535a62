//! Data models for tunedeck
//!
//! Library entities, preference values and the download index.

mod album;
mod artist;
mod download;
mod enums;
mod playlist;
pub mod preferences;
mod song;

pub use album::Album;
pub use artist::{Artist, ArtistPage, ArtistRef};
pub use download::{DownloadIndex, DownloadState, DownloadStatus};
pub use enums::{
    AlbumSortType, ArtistSongSortType, ArtistSortType, ArtistViewType, PlaylistSortType,
    PreferenceEnum, SongSortType, SongViewType,
};
pub use playlist::Playlist;
pub use preferences::{PreferenceKeys, PreferenceSnapshot, PreferenceValue, Preferences};
pub use song::Song;
