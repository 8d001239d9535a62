//! In-memory music database with live queries

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use super::{LibrarySnapshot, MusicDatabase};
use crate::engine::LiveQuery;
use crate::errors::QueryError;
use crate::library::SortLib;
use crate::models::{
    Album, AlbumSortType, Artist, ArtistPage, ArtistSongSortType, ArtistSortType, Playlist,
    PlaylistSortType, Song, SongSortType,
};

/// Library held in memory; every write re-runs the live queries
pub struct MemoryDatabase {
    state: Arc<RwLock<LibrarySnapshot>>,
    /// Bumped on every write; live queries recompute when it changes
    version: watch::Sender<u64>,
    /// Live query streams currently open
    active: Arc<AtomicUsize>,
    /// Queries opened so far
    opened: AtomicUsize,
    /// Number of upcoming query openings that fail immediately
    failures: AtomicUsize,
    /// Apply store-side ordering to sorted queries
    sorting: bool,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new(LibrarySnapshot::default())
    }
}

impl MemoryDatabase {
    pub fn new(snapshot: LibrarySnapshot) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(snapshot)),
            version,
            active: Arc::new(AtomicUsize::new(0)),
            opened: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            sorting: true,
        }
    }

    /// Return rows in insertion order, like a store queried without ORDER BY
    pub fn without_sorting(mut self) -> Self {
        self.sorting = false;
        self
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> LibrarySnapshot {
        self.state.read().clone()
    }

    /// Apply a write and notify live queries
    pub fn write<R>(&self, f: impl FnOnce(&mut LibrarySnapshot) -> R) -> R {
        let result = f(&mut self.state.write());
        self.version.send_modify(|v| *v += 1);
        result
    }

    /// Apply a fallible write; live queries are only notified when it succeeds
    pub fn try_write<R, E>(
        &self,
        f: impl FnOnce(&mut LibrarySnapshot) -> Result<R, E>,
    ) -> Result<R, E> {
        let result = f(&mut self.state.write())?;
        self.version.send_modify(|v| *v += 1);
        Ok(result)
    }

    pub fn insert_song(&self, song: Song) {
        self.write(|lib| lib.songs.push(song));
    }

    pub fn insert_artist(&self, artist: Artist) {
        self.write(|lib| lib.artists.push(artist));
    }

    /// Live query streams currently open
    pub fn active_queries(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Queries opened since creation
    pub fn opened_queries(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Make the next `count` query openings fail
    pub fn fail_next_queries(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn live<V, F>(&self, query: &'static str, compute: F) -> BoxStream<'static, Result<V, QueryError>>
    where
        V: Send + 'static,
        F: Fn(&LibrarySnapshot) -> V + Send + 'static,
    {
        self.opened.fetch_add(1, Ordering::SeqCst);

        if self.take_failure() {
            debug!("Failing query {} on request", query);
            return stream::once(async move { Err(QueryError::failed(query, "injected failure")) })
                .boxed();
        }

        let guard = ActiveQuery::new(&self.active);
        let state = Arc::clone(&self.state);
        WatchStream::new(self.version.subscribe())
            .map(move |_| {
                let _open = &guard;
                Ok(compute(&state.read()))
            })
            .boxed()
    }
}

#[async_trait]
impl MusicDatabase for MemoryDatabase {
    fn songs(&self, sort: SongSortType, descending: bool) -> LiveQuery<Vec<Song>> {
        let sorting = self.sorting;
        self.live("songs", move |lib| {
            let songs = lib.songs.iter().filter(|s| s.in_library).cloned().collect();
            apply(sorting, songs, |rows| SortLib::sort_songs(rows, sort, descending))
        })
    }

    fn liked_songs(&self, sort: SongSortType, descending: bool) -> LiveQuery<Vec<Song>> {
        let sorting = self.sorting;
        self.live("liked_songs", move |lib| {
            let songs = lib.songs.iter().filter(|s| s.liked).cloned().collect();
            apply(sorting, songs, |rows| SortLib::sort_songs(rows, sort, descending))
        })
    }

    fn songs_by_ids(&self, ids: Vec<String>) -> LiveQuery<Vec<Song>> {
        self.live("songs_by_ids", move |lib| {
            lib.songs
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect()
        })
    }

    fn artists(&self, sort: ArtistSortType, descending: bool) -> LiveQuery<Vec<Artist>> {
        let sorting = self.sorting;
        self.live("artists", move |lib| {
            apply(sorting, lib.artists.clone(), |rows| {
                SortLib::sort_artists(rows, sort, descending)
            })
        })
    }

    fn bookmarked_artists(
        &self,
        sort: ArtistSortType,
        descending: bool,
    ) -> LiveQuery<Vec<Artist>> {
        let sorting = self.sorting;
        self.live("bookmarked_artists", move |lib| {
            let artists = lib.artists.iter().filter(|a| a.bookmarked).cloned().collect();
            apply(sorting, artists, |rows| SortLib::sort_artists(rows, sort, descending))
        })
    }

    fn albums(&self, sort: AlbumSortType, descending: bool) -> LiveQuery<Vec<Album>> {
        let sorting = self.sorting;
        self.live("albums", move |lib| {
            apply(sorting, lib.albums.clone(), |rows| {
                SortLib::sort_albums(rows, sort, descending)
            })
        })
    }

    fn playlists(&self, sort: PlaylistSortType, descending: bool) -> LiveQuery<Vec<Playlist>> {
        let sorting = self.sorting;
        self.live("playlists", move |lib| {
            apply(sorting, lib.playlists.clone(), |rows| {
                SortLib::sort_playlists(rows, sort, descending)
            })
        })
    }

    fn artist(&self, id: &str) -> BoxStream<'static, Result<Option<Artist>, QueryError>> {
        let id = id.to_string();
        self.live("artist", move |lib| {
            lib.artists.iter().find(|a| a.id == id).cloned()
        })
    }

    fn artist_songs(
        &self,
        artist_id: &str,
        sort: ArtistSongSortType,
        descending: bool,
    ) -> LiveQuery<Vec<Song>> {
        let sorting = self.sorting;
        let artist_id = artist_id.to_string();
        self.live("artist_songs", move |lib| {
            let songs = lib
                .songs
                .iter()
                .filter(|s| s.in_library && s.has_artist(&artist_id))
                .cloned()
                .collect();
            apply(sorting, songs, |rows| {
                SortLib::sort_artist_songs(rows, sort, descending)
            })
        })
    }

    async fn update_artist(&self, artist: &Artist, page: &ArtistPage) -> Result<(), QueryError> {
        let now = Utc::now();
        self.try_write(|lib| {
            let stored = lib
                .artists
                .iter_mut()
                .find(|a| a.id == artist.id)
                .ok_or_else(|| QueryError::ArtistNotFound(artist.id.clone()))?;
            stored.apply_page(page, now);
            Ok(())
        })
    }
}

fn apply<T>(sorting: bool, mut rows: Vec<T>, sort: impl FnOnce(&mut [T])) -> Vec<T> {
    if sorting {
        sort(&mut rows);
    }
    rows
}

/// Counts an open live query until dropped
struct ActiveQuery(Arc<AtomicUsize>);

impl ActiveQuery {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for ActiveQuery {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
