//! Albums and playlists screens

use std::sync::Arc;

use crate::engine::{launch, LiveQuery, LiveResult, LiveValue, QuerySource, ViewModelScope};
use crate::library::selector::{
    select_albums, select_playlists, AlbumPreferences, AlbumQuery, PlaylistPreferences,
    PlaylistQuery,
};
use crate::library::LibraryContext;
use crate::models::preferences::{ALBUM_KEYS, PLAYLIST_KEYS};
use crate::models::{Album, Playlist, Preferences};
use crate::stores::MusicDatabase;

/// Album queries for the albums screen
pub struct AlbumsSource {
    database: Arc<dyn MusicDatabase>,
}

impl AlbumsSource {
    pub fn new(database: Arc<dyn MusicDatabase>) -> Self {
        Self { database }
    }
}

impl QuerySource for AlbumsSource {
    type Snapshot = AlbumPreferences;
    type Query = AlbumQuery;
    type Output = Vec<Album>;

    fn decode(&self, prefs: &Preferences) -> AlbumPreferences {
        AlbumPreferences::decode(prefs, &ALBUM_KEYS)
    }

    fn select(&self, snapshot: &AlbumPreferences) -> AlbumQuery {
        select_albums(snapshot)
    }

    fn open(&self, query: &AlbumQuery) -> LiveQuery<Vec<Album>> {
        self.database.albums(query.sort, query.descending)
    }
}

/// Playlist queries for the playlists screen
pub struct PlaylistsSource {
    database: Arc<dyn MusicDatabase>,
}

impl PlaylistsSource {
    pub fn new(database: Arc<dyn MusicDatabase>) -> Self {
        Self { database }
    }
}

impl QuerySource for PlaylistsSource {
    type Snapshot = PlaylistPreferences;
    type Query = PlaylistQuery;
    type Output = Vec<Playlist>;

    fn decode(&self, prefs: &Preferences) -> PlaylistPreferences {
        PlaylistPreferences::decode(prefs, &PLAYLIST_KEYS)
    }

    fn select(&self, snapshot: &PlaylistPreferences) -> PlaylistQuery {
        select_playlists(snapshot)
    }

    fn open(&self, query: &PlaylistQuery) -> LiveQuery<Vec<Playlist>> {
        self.database.playlists(query.sort, query.descending)
    }
}

/// Library albums in the user's sort order
pub struct LibraryAlbums {
    scope: ViewModelScope,
    all_albums: LiveValue<LiveResult<Album>>,
}

impl LibraryAlbums {
    pub fn new(ctx: &LibraryContext) -> Self {
        let scope = ViewModelScope::new();
        let all_albums = launch(
            "albums",
            &scope,
            ctx.preferences.changes(),
            AlbumsSource::new(Arc::clone(&ctx.database)),
            ctx.pipeline_options(),
        );
        Self { scope, all_albums }
    }

    pub fn all_albums(&self) -> &LiveValue<LiveResult<Album>> {
        &self.all_albums
    }

    pub fn scope(&self) -> &ViewModelScope {
        &self.scope
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for LibraryAlbums {
    fn drop(&mut self) {
        self.scope.close();
    }
}

/// Library playlists in the user's sort order
pub struct LibraryPlaylists {
    scope: ViewModelScope,
    all_playlists: LiveValue<LiveResult<Playlist>>,
}

impl LibraryPlaylists {
    pub fn new(ctx: &LibraryContext) -> Self {
        let scope = ViewModelScope::new();
        let all_playlists = launch(
            "playlists",
            &scope,
            ctx.preferences.changes(),
            PlaylistsSource::new(Arc::clone(&ctx.database)),
            ctx.pipeline_options(),
        );
        Self {
            scope,
            all_playlists,
        }
    }

    pub fn all_playlists(&self) -> &LiveValue<LiveResult<Playlist>> {
        &self.all_playlists
    }

    pub fn scope(&self) -> &ViewModelScope {
        &self.scope
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for LibraryPlaylists {
    fn drop(&mut self) {
        self.scope.close();
    }
}
