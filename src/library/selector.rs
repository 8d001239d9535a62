//! Query selection: typed preferences to data-layer query descriptors

use crate::models::{
    AlbumSortType, ArtistSongSortType, ArtistSortType, ArtistViewType, PlaylistSortType,
    PreferenceSnapshot, SongSortType, SongViewType,
};

pub type SongPreferences = PreferenceSnapshot<SongViewType, SongSortType>;
pub type ArtistPreferences = PreferenceSnapshot<ArtistViewType, ArtistSortType>;
pub type AlbumPreferences = PreferenceSnapshot<(), AlbumSortType>;
pub type PlaylistPreferences = PreferenceSnapshot<(), PlaylistSortType>;
pub type ArtistSongPreferences = PreferenceSnapshot<(), ArtistSongSortType>;

/// Which live song query to subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongQuery {
    /// Store-sorted library songs
    Library { sort: SongSortType, descending: bool },
    /// Store-sorted liked songs
    Liked { sort: SongSortType, descending: bool },
    /// Completed downloads, sorted in memory after the join
    Downloaded { sort: SongSortType, descending: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistQuery {
    Library { sort: ArtistSortType, descending: bool },
    Bookmarked { sort: ArtistSortType, descending: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumQuery {
    pub sort: AlbumSortType,
    pub descending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistQuery {
    pub sort: PlaylistSortType,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSongsQuery {
    pub artist_id: String,
    pub sort: ArtistSongSortType,
    pub descending: bool,
}

pub fn select_songs(prefs: &SongPreferences) -> SongQuery {
    let (sort, descending) = (prefs.sort, prefs.descending);
    match prefs.view {
        SongViewType::Library => SongQuery::Library { sort, descending },
        SongViewType::Liked => SongQuery::Liked { sort, descending },
        SongViewType::Downloaded => SongQuery::Downloaded { sort, descending },
    }
}

pub fn select_artists(prefs: &ArtistPreferences) -> ArtistQuery {
    let (sort, descending) = (prefs.sort, prefs.descending);
    match prefs.view {
        ArtistViewType::Library => ArtistQuery::Library { sort, descending },
        ArtistViewType::Bookmarked => ArtistQuery::Bookmarked { sort, descending },
    }
}

pub fn select_albums(prefs: &AlbumPreferences) -> AlbumQuery {
    AlbumQuery {
        sort: prefs.sort,
        descending: prefs.descending,
    }
}

pub fn select_playlists(prefs: &PlaylistPreferences) -> PlaylistQuery {
    PlaylistQuery {
        sort: prefs.sort,
        descending: prefs.descending,
    }
}

pub fn select_artist_songs(artist_id: &str, prefs: &ArtistSongPreferences) -> ArtistSongsQuery {
    ArtistSongsQuery {
        artist_id: artist_id.to_string(),
        sort: prefs.sort,
        descending: prefs.descending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::{SONG_KEYS, SONG_SORT_TYPE, SONG_VIEW_TYPE};
    use crate::models::{PreferenceEnum, Preferences};

    #[test]
    fn test_song_selection_is_total_and_deterministic() {
        for view in SongViewType::ALL {
            for sort in SongSortType::ALL {
                for descending in [false, true] {
                    let prefs = SongPreferences {
                        view: *view,
                        sort: *sort,
                        descending,
                    };
                    let query = select_songs(&prefs);
                    assert_eq!(query, select_songs(&prefs));
                    let (q_sort, q_desc) = match query {
                        SongQuery::Library { sort, descending }
                        | SongQuery::Liked { sort, descending }
                        | SongQuery::Downloaded { sort, descending } => (sort, descending),
                    };
                    assert_eq!((q_sort, q_desc), (*sort, descending));
                }
            }
        }
    }

    #[test]
    fn test_downloaded_query_carries_sort() {
        let prefs = SongPreferences {
            view: SongViewType::Downloaded,
            sort: SongSortType::Artist,
            descending: false,
        };
        assert_eq!(
            select_songs(&prefs),
            SongQuery::Downloaded {
                sort: SongSortType::Artist,
                descending: false
            }
        );
    }

    #[test]
    fn test_unknown_stored_values_select_default_query() {
        let prefs = Preferences::new()
            .with(SONG_VIEW_TYPE, "SHUFFLED")
            .with(SONG_SORT_TYPE, "BPM");
        let query = select_songs(&SongPreferences::decode(&prefs, &SONG_KEYS));
        assert_eq!(
            query,
            SongQuery::Library {
                sort: SongSortType::CreateDate,
                descending: true
            }
        );
    }

    #[test]
    fn test_artist_selection() {
        for view in ArtistViewType::ALL {
            for sort in ArtistSortType::ALL {
                let query = select_artists(&ArtistPreferences {
                    view: *view,
                    sort: *sort,
                    descending: false,
                });
                match (view, query) {
                    (ArtistViewType::Library, ArtistQuery::Library { .. })
                    | (ArtistViewType::Bookmarked, ArtistQuery::Bookmarked { .. }) => {}
                    other => panic!("unexpected selection {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_artist_songs_query_keeps_route_id() {
        let query = select_artist_songs(
            "UC42",
            &ArtistSongPreferences {
                view: (),
                sort: ArtistSongSortType::Name,
                descending: true,
            },
        );
        assert_eq!(query.artist_id, "UC42");
        assert_eq!(query.sort, ArtistSongSortType::Name);
    }
}
