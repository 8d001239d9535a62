//! Artists screen and artist detail screen

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::engine::{
    launch, resubscribing, LiveQuery, LiveResult, LiveValue, QuerySource, ViewModelScope,
};
use crate::errors::RouteError;
use crate::library::selector::{
    select_artist_songs, select_artists, ArtistPreferences, ArtistQuery, ArtistSongPreferences,
    ArtistSongsQuery,
};
use crate::library::sweeper::StalenessSweeper;
use crate::library::LibraryContext;
use crate::models::preferences::{ARTIST_KEYS, ARTIST_SONG_KEYS};
use crate::models::{Artist, Preferences, Song};
use crate::stores::MusicDatabase;

/// Route argument naming the artist of the detail screen
pub const ARTIST_ID_ARG: &str = "artistId";

/// Artist queries for the artists screen
pub struct ArtistsSource {
    database: Arc<dyn MusicDatabase>,
}

impl ArtistsSource {
    pub fn new(database: Arc<dyn MusicDatabase>) -> Self {
        Self { database }
    }
}

impl QuerySource for ArtistsSource {
    type Snapshot = ArtistPreferences;
    type Query = ArtistQuery;
    type Output = Vec<Artist>;

    fn decode(&self, prefs: &Preferences) -> ArtistPreferences {
        ArtistPreferences::decode(prefs, &ARTIST_KEYS)
    }

    fn select(&self, snapshot: &ArtistPreferences) -> ArtistQuery {
        select_artists(snapshot)
    }

    fn open(&self, query: &ArtistQuery) -> LiveQuery<Vec<Artist>> {
        match *query {
            ArtistQuery::Library { sort, descending } => self.database.artists(sort, descending),
            ArtistQuery::Bookmarked { sort, descending } => {
                self.database.bookmarked_artists(sort, descending)
            }
        }
    }
}

/// Library artists, with background refresh of stale metadata
pub struct LibraryArtists {
    scope: ViewModelScope,
    all_artists: LiveValue<LiveResult<Artist>>,
}

impl LibraryArtists {
    pub fn new(ctx: &LibraryContext) -> Self {
        let scope = ViewModelScope::new();
        let all_artists = launch(
            "artists",
            &scope,
            ctx.preferences.changes(),
            ArtistsSource::new(Arc::clone(&ctx.database)),
            ctx.pipeline_options(),
        );

        match &ctx.metadata {
            Some(client) => StalenessSweeper::new(
                Arc::clone(&ctx.database),
                Arc::clone(client),
                ctx.settings.artist_max_age(),
            )
            .spawn(&scope, all_artists.subscribe()),
            None => debug!("No metadata client, artist sweep disabled"),
        }

        Self { scope, all_artists }
    }

    pub fn all_artists(&self) -> &LiveValue<LiveResult<Artist>> {
        &self.all_artists
    }

    pub fn scope(&self) -> &ViewModelScope {
        &self.scope
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for LibraryArtists {
    fn drop(&mut self) {
        self.scope.close();
    }
}

/// Song queries for one artist's detail screen
pub struct ArtistSongsSource {
    database: Arc<dyn MusicDatabase>,
    artist_id: String,
}

impl ArtistSongsSource {
    pub fn new(database: Arc<dyn MusicDatabase>, artist_id: impl Into<String>) -> Self {
        Self {
            database,
            artist_id: artist_id.into(),
        }
    }
}

impl QuerySource for ArtistSongsSource {
    type Snapshot = ArtistSongPreferences;
    type Query = ArtistSongsQuery;
    type Output = Vec<Song>;

    fn decode(&self, prefs: &Preferences) -> ArtistSongPreferences {
        ArtistSongPreferences::decode(prefs, &ARTIST_SONG_KEYS)
    }

    fn select(&self, snapshot: &ArtistSongPreferences) -> ArtistSongsQuery {
        select_artist_songs(&self.artist_id, snapshot)
    }

    fn open(&self, query: &ArtistSongsQuery) -> LiveQuery<Vec<Song>> {
        self.database
            .artist_songs(&query.artist_id, query.sort, query.descending)
    }
}

/// Detail screen for a single artist
pub struct ArtistSongs {
    scope: ViewModelScope,
    artist_id: String,
    artist: LiveValue<Option<Artist>>,
    songs: LiveValue<LiveResult<Song>>,
}

impl ArtistSongs {
    /// Build from navigation arguments; `artistId` is required
    pub fn new(ctx: &LibraryContext, route: &HashMap<String, String>) -> Result<Self, RouteError> {
        let artist_id = route
            .get(ARTIST_ID_ARG)
            .filter(|id| !id.is_empty())
            .cloned()
            .ok_or(RouteError::MissingArgument(ARTIST_ID_ARG))?;

        let scope = ViewModelScope::new();
        let options = ctx.pipeline_options();

        let database = Arc::clone(&ctx.database);
        let id = artist_id.clone();
        let artist = LiveValue::new(
            "artist",
            &scope,
            None,
            resubscribing(
                format!("artist:{artist_id}"),
                move || database.artist(&id),
                options.backoff,
            ),
            options.sharing,
        );

        let songs = launch(
            "artist_songs",
            &scope,
            ctx.preferences.changes(),
            ArtistSongsSource::new(Arc::clone(&ctx.database), artist_id.clone()),
            options,
        );

        Ok(Self {
            scope,
            artist_id,
            artist,
            songs,
        })
    }

    pub fn artist_id(&self) -> &str {
        &self.artist_id
    }

    /// The artist record, `None` until it exists in the store
    pub fn artist(&self) -> &LiveValue<Option<Artist>> {
        &self.artist
    }

    pub fn songs(&self) -> &LiveValue<LiveResult<Song>> {
        &self.songs
    }

    pub fn scope(&self) -> &ViewModelScope {
        &self.scope
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for ArtistSongs {
    fn drop(&mut self) {
        self.scope.close();
    }
}
