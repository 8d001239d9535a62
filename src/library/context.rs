//! Collaborators shared by every library screen

use std::sync::Arc;

use crate::config::Settings;
use crate::engine::PipelineOptions;
use crate::plugins::ArtistMetadataClient;
use crate::stores::{DownloadTracker, MusicDatabase, PreferenceStore};

/// Handles a screen needs to build its pipelines
#[derive(Clone)]
pub struct LibraryContext {
    pub preferences: Arc<dyn PreferenceStore>,
    pub database: Arc<dyn MusicDatabase>,
    pub downloads: Arc<dyn DownloadTracker>,
    /// Remote artist metadata; without it stale artists are left alone
    pub metadata: Option<Arc<dyn ArtistMetadataClient>>,
    pub settings: Settings,
}

impl LibraryContext {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        database: Arc<dyn MusicDatabase>,
        downloads: Arc<dyn DownloadTracker>,
        settings: Settings,
    ) -> Self {
        Self {
            preferences,
            database,
            downloads,
            metadata: None,
            settings,
        }
    }

    pub fn with_metadata(mut self, client: Arc<dyn ArtistMetadataClient>) -> Self {
        self.metadata = Some(client);
        self
    }

    pub(crate) fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            backoff: self.settings.backoff(),
            sharing: self.settings.sharing,
        }
    }
}

impl std::fmt::Debug for LibraryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryContext")
            .field("metadata", &self.metadata.is_some())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
