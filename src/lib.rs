//! tunedeck - reactive library views for a music player
//!
//! Songs, artists, albums and playlists are exposed as shared live values that
//! re-derive their query whenever the user's view or sort preferences change.
//! Artist metadata is refreshed in the background when it goes stale.

pub mod config;
pub mod engine;
pub mod errors;
pub mod library;
pub mod models;
pub mod plugins;
pub mod stores;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{DecodeError, PreferenceError, QueryError, RefreshError, RouteError};
pub use library::{
    ArtistSongs, LibraryAlbums, LibraryArtists, LibraryContext, LibraryPlaylists, LibrarySongs,
};
