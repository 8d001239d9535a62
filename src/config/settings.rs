//! Engine settings
//!
//! Built-in defaults, overridden by an optional settings file and then by
//! `TUNEDECK_*` environment variables.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_ARTIST_MAX_AGE_DAYS, ENV_PREFIX};
use crate::engine::Backoff;

/// When a shared live value starts its upstream pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharingPolicy {
    /// Start on the first subscriber, then keep running until the scope closes
    #[default]
    Lazy,
    /// Start as soon as the live value is built
    Eager,
}

/// Tunables for the query pipelines and the staleness sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Artist metadata older than this many days is refetched
    pub artist_max_age_days: i64,

    /// First delay before re-opening a failed query
    pub resubscribe_initial_backoff_ms: u64,

    /// Upper bound for the re-open delay
    pub resubscribe_max_backoff_ms: u64,

    /// Live value start policy
    pub sharing: SharingPolicy,

    /// Base URL of the artist metadata service
    pub metadata_base_url: Option<String>,

    /// Per-request timeout for metadata fetches
    pub metadata_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artist_max_age_days: DEFAULT_ARTIST_MAX_AGE_DAYS,
            resubscribe_initial_backoff_ms: 500,
            resubscribe_max_backoff_ms: 30_000,
            sharing: SharingPolicy::Lazy,
            metadata_base_url: None,
            metadata_timeout_secs: 15,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Failed to parse settings")
    }

    /// Re-open policy for failed live queries
    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.resubscribe_initial_backoff_ms),
            Duration::from_millis(self.resubscribe_max_backoff_ms),
        )
    }

    /// Freshness threshold for cached artist metadata
    pub fn artist_max_age(&self) -> chrono::Duration {
        chrono::Duration::days(self.artist_max_age_days)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.artist_max_age_days, 10);
        assert_eq!(settings.sharing, SharingPolicy::Lazy);
        assert_eq!(settings.artist_max_age(), chrono::Duration::days(10));
        assert!(settings.metadata_base_url.is_none());
    }

    #[test]
    fn test_load_from_file_keeps_unset_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "artist_max_age_days = 3").unwrap();
        writeln!(file, "sharing = \"eager\"").unwrap();
        writeln!(file, "metadata_base_url = \"http://localhost:9000\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.artist_max_age_days, 3);
        assert_eq!(settings.sharing, SharingPolicy::Eager);
        assert_eq!(settings.metadata_base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(settings.resubscribe_max_backoff_ms, 30_000);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.metadata_timeout_secs, 15);
    }
}
