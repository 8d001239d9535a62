//! Data layer seam: live queries over the music library

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::engine::LiveQuery;
use crate::errors::QueryError;
use crate::models::{
    Album, AlbumSortType, Artist, ArtistPage, ArtistSongSortType, ArtistSortType, Playlist,
    PlaylistSortType, Song, SongSortType,
};

/// Music library store
///
/// Every query is live: it emits the full current answer when subscribed and
/// again after each write that may affect it. Dropping the stream ends the
/// subscription. Sorted queries are ordered by the store itself.
#[async_trait]
pub trait MusicDatabase: Send + Sync + 'static {
    /// Songs in the library
    fn songs(&self, sort: SongSortType, descending: bool) -> LiveQuery<Vec<Song>>;

    /// Liked songs
    fn liked_songs(&self, sort: SongSortType, descending: bool) -> LiveQuery<Vec<Song>>;

    /// Songs with exactly these ids, in store order, unsorted
    fn songs_by_ids(&self, ids: Vec<String>) -> LiveQuery<Vec<Song>>;

    /// Artists in the library
    fn artists(&self, sort: ArtistSortType, descending: bool) -> LiveQuery<Vec<Artist>>;

    /// Bookmarked artists
    fn bookmarked_artists(&self, sort: ArtistSortType, descending: bool)
        -> LiveQuery<Vec<Artist>>;

    fn albums(&self, sort: AlbumSortType, descending: bool) -> LiveQuery<Vec<Album>>;

    fn playlists(&self, sort: PlaylistSortType, descending: bool) -> LiveQuery<Vec<Playlist>>;

    /// A single artist, `None` while it does not exist
    fn artist(&self, id: &str) -> BoxStream<'static, Result<Option<Artist>, QueryError>>;

    /// Songs credited to one artist
    fn artist_songs(
        &self,
        artist_id: &str,
        sort: ArtistSongSortType,
        descending: bool,
    ) -> LiveQuery<Vec<Song>>;

    /// Store refreshed remote metadata for an artist
    async fn update_artist(&self, artist: &Artist, page: &ArtistPage) -> Result<(), QueryError>;
}
