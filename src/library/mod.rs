//! Library screens: songs, artists, albums, playlists and artist detail

pub mod artists;
pub mod collections;
mod context;
pub mod downloaded;
pub mod selector;
pub mod songs;
pub mod sorting;
pub mod sweeper;

pub use artists::{ArtistSongs, LibraryArtists, ARTIST_ID_ARG};
pub use collections::{LibraryAlbums, LibraryPlaylists};
pub use context::LibraryContext;
pub use songs::LibrarySongs;
pub use sorting::SortLib;
pub use sweeper::{StalenessSweeper, SweepReport};
