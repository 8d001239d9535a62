//! Untyped preference storage values and their typed snapshots

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::PreferenceEnum;
use crate::errors::DecodeError;

pub const SONG_VIEW_TYPE: &str = "songViewType";
pub const SONG_SORT_TYPE: &str = "songSortType";
pub const SONG_SORT_DESCENDING: &str = "songSortDescending";
pub const ARTIST_VIEW_TYPE: &str = "artistViewType";
pub const ARTIST_SORT_TYPE: &str = "artistSortType";
pub const ARTIST_SORT_DESCENDING: &str = "artistSortDescending";
pub const ALBUM_SORT_TYPE: &str = "albumSortType";
pub const ALBUM_SORT_DESCENDING: &str = "albumSortDescending";
pub const PLAYLIST_SORT_TYPE: &str = "playlistSortType";
pub const PLAYLIST_SORT_DESCENDING: &str = "playlistSortDescending";
pub const ARTIST_SONG_SORT_TYPE: &str = "artistSongSortType";
pub const ARTIST_SONG_SORT_DESCENDING: &str = "artistSongSortDescending";

/// Direction used when nothing valid is stored
pub const DEFAULT_DESCENDING: bool = true;

/// Raw key/value preferences as the storage backend holds them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(BTreeMap<String, String>);

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Builder-style set, handy when seeding a store
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Keys that make up one screen's view/sort preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceKeys {
    /// `None` for screens with a single implicit view
    pub view: Option<&'static str>,
    pub sort: &'static str,
    pub descending: &'static str,
}

pub const SONG_KEYS: PreferenceKeys = PreferenceKeys {
    view: Some(SONG_VIEW_TYPE),
    sort: SONG_SORT_TYPE,
    descending: SONG_SORT_DESCENDING,
};

pub const ARTIST_KEYS: PreferenceKeys = PreferenceKeys {
    view: Some(ARTIST_VIEW_TYPE),
    sort: ARTIST_SORT_TYPE,
    descending: ARTIST_SORT_DESCENDING,
};

pub const ALBUM_KEYS: PreferenceKeys = PreferenceKeys {
    view: None,
    sort: ALBUM_SORT_TYPE,
    descending: ALBUM_SORT_DESCENDING,
};

pub const PLAYLIST_KEYS: PreferenceKeys = PreferenceKeys {
    view: None,
    sort: PLAYLIST_SORT_TYPE,
    descending: PLAYLIST_SORT_DESCENDING,
};

pub const ARTIST_SONG_KEYS: PreferenceKeys = PreferenceKeys {
    view: None,
    sort: ARTIST_SONG_SORT_TYPE,
    descending: ARTIST_SONG_SORT_DESCENDING,
};

/// A value that can be read out of untyped preferences
pub trait PreferenceValue: Sized {
    /// Strict decode; `Ok(None)` when the key is absent
    fn try_decode(prefs: &Preferences, key: Option<&str>) -> Result<Option<Self>, DecodeError>;

    /// The value used when nothing valid is stored
    fn fallback() -> Self;

    /// Lenient decode: missing or invalid values resolve to the fallback
    fn decode(prefs: &Preferences, key: Option<&str>) -> Self {
        match Self::try_decode(prefs, key) {
            Ok(Some(value)) => value,
            Ok(None) => Self::fallback(),
            Err(e) => {
                tracing::debug!("{}, using default", e);
                Self::fallback()
            }
        }
    }
}

impl<E: PreferenceEnum> PreferenceValue for E {
    fn try_decode(prefs: &Preferences, key: Option<&str>) -> Result<Option<Self>, DecodeError> {
        let Some(key) = key else {
            return Ok(None);
        };
        match prefs.get(key) {
            None => Ok(None),
            Some(raw) => E::parse(raw).map(Some).ok_or_else(|| DecodeError::UnknownValue {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    fn fallback() -> Self {
        E::default()
    }
}

/// Screens with a single implicit view
impl PreferenceValue for () {
    fn try_decode(_prefs: &Preferences, _key: Option<&str>) -> Result<Option<Self>, DecodeError> {
        Ok(Some(()))
    }

    fn fallback() -> Self {}
}

/// Sort direction, stored as `true`/`false`
pub fn decode_descending(prefs: &Preferences, key: &str) -> bool {
    match try_decode_bool(prefs, key) {
        Ok(Some(value)) => value,
        Ok(None) => DEFAULT_DESCENDING,
        Err(e) => {
            tracing::debug!("{}, using default", e);
            DEFAULT_DESCENDING
        }
    }
}

fn try_decode_bool(prefs: &Preferences, key: &str) -> Result<Option<bool>, DecodeError> {
    match prefs.get(key) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(raw) => Err(DecodeError::InvalidBool {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Typed view/sort/direction for one screen, compared structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreferenceSnapshot<V, S> {
    pub view: V,
    pub sort: S,
    pub descending: bool,
}

impl<V: PreferenceValue, S: PreferenceValue> PreferenceSnapshot<V, S> {
    /// Read a snapshot, resolving anything missing or invalid to its default
    pub fn decode(prefs: &Preferences, keys: &PreferenceKeys) -> Self {
        Self {
            view: V::decode(prefs, keys.view),
            sort: S::decode(prefs, Some(keys.sort)),
            descending: decode_descending(prefs, keys.descending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlbumSortType, SongSortType, SongViewType};

    type SongPrefs = PreferenceSnapshot<SongViewType, SongSortType>;

    #[test]
    fn test_empty_preferences_decode_to_defaults() {
        let snapshot = SongPrefs::decode(&Preferences::new(), &SONG_KEYS);
        assert_eq!(snapshot.view, SongViewType::Library);
        assert_eq!(snapshot.sort, SongSortType::CreateDate);
        assert!(snapshot.descending);
    }

    #[test]
    fn test_stored_values_are_read() {
        let prefs = Preferences::new()
            .with(SONG_VIEW_TYPE, "DOWNLOADED")
            .with(SONG_SORT_TYPE, "NAME")
            .with(SONG_SORT_DESCENDING, "false");
        let snapshot = SongPrefs::decode(&prefs, &SONG_KEYS);
        assert_eq!(snapshot.view, SongViewType::Downloaded);
        assert_eq!(snapshot.sort, SongSortType::Name);
        assert!(!snapshot.descending);
    }

    #[test]
    fn test_invalid_values_fall_back_per_field() {
        let prefs = Preferences::new()
            .with(SONG_VIEW_TYPE, "LIKED")
            .with(SONG_SORT_TYPE, "RANDOM")
            .with(SONG_SORT_DESCENDING, "yes");
        let snapshot = SongPrefs::decode(&prefs, &SONG_KEYS);
        assert_eq!(snapshot.view, SongViewType::Liked);
        assert_eq!(snapshot.sort, SongSortType::CreateDate);
        assert!(snapshot.descending);
    }

    #[test]
    fn test_try_decode_reports_the_bad_value() {
        let prefs = Preferences::new().with(SONG_SORT_TYPE, "RANDOM");
        let err = SongSortType::try_decode(&prefs, Some(SONG_SORT_TYPE)).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownValue {
                key: SONG_SORT_TYPE.to_string(),
                value: "RANDOM".to_string(),
            }
        );
    }

    #[test]
    fn test_single_view_screens_ignore_view_key() {
        let prefs = Preferences::new().with(ALBUM_SORT_TYPE, "YEAR");
        let snapshot = PreferenceSnapshot::<(), AlbumSortType>::decode(&prefs, &ALBUM_KEYS);
        assert_eq!(snapshot.sort, AlbumSortType::Year);
        assert!(snapshot.descending);
    }

    #[test]
    fn test_unrelated_keys_do_not_change_snapshot() {
        let base = Preferences::new().with(SONG_SORT_TYPE, "NAME");
        let other = base.clone().with(ALBUM_SORT_TYPE, "YEAR");
        assert_eq!(
            SongPrefs::decode(&base, &SONG_KEYS),
            SongPrefs::decode(&other, &SONG_KEYS)
        );
    }
}
