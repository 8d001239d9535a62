//! Songs screen

use std::sync::Arc;

use crate::engine::{launch, LiveQuery, LiveResult, LiveValue, QuerySource, ViewModelScope};
use crate::library::downloaded::downloaded_songs;
use crate::library::selector::{select_songs, SongPreferences, SongQuery};
use crate::library::LibraryContext;
use crate::models::preferences::SONG_KEYS;
use crate::models::{Preferences, Song};
use crate::stores::{DownloadTracker, MusicDatabase};

/// Song queries for the songs screen
pub struct SongsSource {
    database: Arc<dyn MusicDatabase>,
    downloads: Arc<dyn DownloadTracker>,
}

impl SongsSource {
    pub fn new(database: Arc<dyn MusicDatabase>, downloads: Arc<dyn DownloadTracker>) -> Self {
        Self {
            database,
            downloads,
        }
    }
}

impl QuerySource for SongsSource {
    type Snapshot = SongPreferences;
    type Query = SongQuery;
    type Output = Vec<Song>;

    fn decode(&self, prefs: &Preferences) -> SongPreferences {
        SongPreferences::decode(prefs, &SONG_KEYS)
    }

    fn select(&self, snapshot: &SongPreferences) -> SongQuery {
        select_songs(snapshot)
    }

    fn open(&self, query: &SongQuery) -> LiveQuery<Vec<Song>> {
        match *query {
            SongQuery::Library { sort, descending } => self.database.songs(sort, descending),
            SongQuery::Liked { sort, descending } => self.database.liked_songs(sort, descending),
            SongQuery::Downloaded { sort, descending } => downloaded_songs(
                Arc::clone(&self.database),
                self.downloads.downloads(),
                sort,
                descending,
            ),
        }
    }
}

/// Library songs following the user's view and sort preferences
pub struct LibrarySongs {
    scope: ViewModelScope,
    all_songs: LiveValue<LiveResult<Song>>,
}

impl LibrarySongs {
    pub fn new(ctx: &LibraryContext) -> Self {
        let scope = ViewModelScope::new();
        let all_songs = launch(
            "songs",
            &scope,
            ctx.preferences.changes(),
            SongsSource::new(Arc::clone(&ctx.database), Arc::clone(&ctx.downloads)),
            ctx.pipeline_options(),
        );
        Self { scope, all_songs }
    }

    pub fn all_songs(&self) -> &LiveValue<LiveResult<Song>> {
        &self.all_songs
    }

    pub fn scope(&self) -> &ViewModelScope {
        &self.scope
    }

    /// Stop every pipeline of this screen
    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for LibrarySongs {
    fn drop(&mut self) {
        self.scope.close();
    }
}
