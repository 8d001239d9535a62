//! Sorting for library lists
//!
//! Every ordering is a stable ascending sort followed by a full reversal when
//! descending, so equal keys also swap places in descending order.

use crate::models::{
    Album, AlbumSortType, Artist, ArtistSongSortType, ArtistSortType, DownloadIndex, Playlist,
    PlaylistSortType, Song, SongSortType,
};

/// Sorting library
pub struct SortLib;

impl SortLib {
    /// Store-side song ordering; text compares case-insensitively
    pub fn sort_songs(songs: &mut [Song], by: SongSortType, descending: bool) {
        match by {
            SongSortType::CreateDate => sort_then_reverse(songs, descending, |s| s.create_date),
            SongSortType::Name => sort_then_reverse(songs, descending, |s| s.title.to_lowercase()),
            SongSortType::Artist => {
                sort_then_reverse(songs, descending, |s| s.artist_key().to_lowercase())
            }
            SongSortType::PlayTime => sort_then_reverse(songs, descending, |s| s.total_play_time),
        }
    }

    /// Ordering of the songs on an artist page
    pub fn sort_artist_songs(songs: &mut [Song], by: ArtistSongSortType, descending: bool) {
        match by {
            ArtistSongSortType::CreateDate => {
                sort_then_reverse(songs, descending, |s| s.create_date)
            }
            ArtistSongSortType::Name => {
                sort_then_reverse(songs, descending, |s| s.title.to_lowercase())
            }
            ArtistSongSortType::PlayTime => {
                sort_then_reverse(songs, descending, |s| s.total_play_time)
            }
        }
    }

    pub fn sort_artists(artists: &mut [Artist], by: ArtistSortType, descending: bool) {
        match by {
            ArtistSortType::CreateDate => sort_then_reverse(artists, descending, |a| a.create_date),
            ArtistSortType::Name => sort_then_reverse(artists, descending, |a| a.name.to_lowercase()),
            ArtistSortType::SongCount => sort_then_reverse(artists, descending, |a| a.song_count),
            ArtistSortType::PlayTime => {
                sort_then_reverse(artists, descending, |a| a.total_play_time)
            }
        }
    }

    pub fn sort_albums(albums: &mut [Album], by: AlbumSortType, descending: bool) {
        match by {
            AlbumSortType::CreateDate => sort_then_reverse(albums, descending, |a| a.create_date),
            AlbumSortType::Name => sort_then_reverse(albums, descending, |a| a.title.to_lowercase()),
            AlbumSortType::Artist => {
                sort_then_reverse(albums, descending, |a| a.artist_key().to_lowercase())
            }
            AlbumSortType::Year => sort_then_reverse(albums, descending, |a| a.year),
            AlbumSortType::SongCount => sort_then_reverse(albums, descending, |a| a.song_count),
            AlbumSortType::Length => sort_then_reverse(albums, descending, |a| a.duration),
            AlbumSortType::PlayTime => sort_then_reverse(albums, descending, |a| a.total_play_time),
        }
    }

    pub fn sort_playlists(playlists: &mut [Playlist], by: PlaylistSortType, descending: bool) {
        match by {
            PlaylistSortType::CreateDate => {
                sort_then_reverse(playlists, descending, |p| p.create_date)
            }
            PlaylistSortType::Name => {
                sort_then_reverse(playlists, descending, |p| p.name.to_lowercase())
            }
            PlaylistSortType::SongCount => {
                sort_then_reverse(playlists, descending, |p| p.song_count)
            }
        }
    }

    /// In-memory ordering for downloaded songs
    ///
    /// Date order uses the download's completion time from `index` (0 when the
    /// song is missing from it). Text keys compare exactly, not case-folded.
    pub fn sort_downloaded(
        mut songs: Vec<Song>,
        index: &DownloadIndex,
        by: SongSortType,
        descending: bool,
    ) -> Vec<Song> {
        match by {
            SongSortType::CreateDate => {
                sort_then_reverse(&mut songs, descending, |s| index.update_time_ms(&s.id))
            }
            SongSortType::Name => sort_then_reverse(&mut songs, descending, |s| s.title.clone()),
            SongSortType::Artist => sort_then_reverse(&mut songs, descending, Song::artist_key),
            SongSortType::PlayTime => {
                sort_then_reverse(&mut songs, descending, |s| s.total_play_time)
            }
        }
        songs
    }
}

fn sort_then_reverse<T, K, F>(items: &mut [T], descending: bool, key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    // stable, and each key is computed once
    items.sort_by_cached_key(key);
    if descending {
        items.reverse();
    }
}
