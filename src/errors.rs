//! Error types for each collaborator boundary

use std::path::PathBuf;

use thiserror::Error;

/// Preference backend failure. Reads never fail; only persisting a change can.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Store-level failure of a live query or a write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query {query} failed: {message}")]
    Failed { query: String, message: String },

    #[error("artist {0} not found")]
    ArtistNotFound(String),
}

impl QueryError {
    pub fn failed(query: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Failed {
            query: query.into(),
            message: message.into(),
        }
    }
}

/// Remote metadata fetch failure
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("metadata request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata service returned {status} for artist {id}")]
    Status { id: String, status: u16 },

    #[error("invalid metadata base url {0:?}")]
    InvalidBaseUrl(String),

    #[error("artist {0} is unknown to the metadata service")]
    NotFound(String),

    #[error("could not store refreshed artist: {0}")]
    Store(#[from] QueryError),
}

/// Invalid stored preference value. Always recovered by falling back to the default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown value {value:?} for preference {key}")]
    UnknownValue { key: String, value: String },

    #[error("expected true or false for preference {key}, got {value:?}")]
    InvalidBool { key: String, value: String },
}

/// Navigation state is missing an argument a screen needs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("missing route argument {0}")]
    MissingArgument(&'static str),
}
