//! View and sort enums persisted as preference values

use serde::{Deserialize, Serialize};

/// A closed set of values stored as a plain string under a preference key
pub trait PreferenceEnum: Sized + Copy + Eq + Default + std::fmt::Debug + 'static {
    /// Every value, in declaration order
    const ALL: &'static [Self];

    /// The stored representation
    fn as_str(&self) -> &'static str;

    /// Parse a stored value; `None` for anything unknown
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }
}

macro_rules! preference_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl PreferenceEnum for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

preference_enum! {
    /// Which subset of the song library to show
    SongViewType, default = Library, {
        Library => "LIBRARY",
        Liked => "LIKED",
        Downloaded => "DOWNLOADED",
    }
}

preference_enum! {
    /// Song ordering
    SongSortType, default = CreateDate, {
        CreateDate => "CREATE_DATE",
        Name => "NAME",
        Artist => "ARTIST",
        PlayTime => "PLAY_TIME",
    }
}

preference_enum! {
    /// Which subset of artists to show
    ArtistViewType, default = Library, {
        Library => "LIBRARY",
        Bookmarked => "BOOKMARKED",
    }
}

preference_enum! {
    /// Artist ordering
    ArtistSortType, default = CreateDate, {
        CreateDate => "CREATE_DATE",
        Name => "NAME",
        SongCount => "SONG_COUNT",
        PlayTime => "PLAY_TIME",
    }
}

preference_enum! {
    /// Album ordering
    AlbumSortType, default = CreateDate, {
        CreateDate => "CREATE_DATE",
        Name => "NAME",
        Artist => "ARTIST",
        Year => "YEAR",
        SongCount => "SONG_COUNT",
        Length => "LENGTH",
        PlayTime => "PLAY_TIME",
    }
}

preference_enum! {
    /// Playlist ordering
    PlaylistSortType, default = CreateDate, {
        CreateDate => "CREATE_DATE",
        Name => "NAME",
        SongCount => "SONG_COUNT",
    }
}

preference_enum! {
    /// Ordering of the songs on an artist's page
    ArtistSongSortType, default = CreateDate, {
        CreateDate => "CREATE_DATE",
        Name => "NAME",
        PlayTime => "PLAY_TIME",
    }
}
