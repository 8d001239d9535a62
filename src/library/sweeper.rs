//! Background refresh of artists with missing or outdated remote metadata

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::engine::{LiveResult, ViewModelScope};
use crate::errors::RefreshError;
use crate::models::Artist;
use crate::plugins::ArtistMetadataClient;
use crate::stores::MusicDatabase;

/// Outcome of one pass over an artist list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub refreshed: Vec<String>,
    pub failed: Vec<String>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.refreshed.is_empty() && self.failed.is_empty()
    }
}

/// Refreshes stale artists one at a time
///
/// An artist refreshed by this sweeper is not requested again until
/// `max_age` has passed, even if the page it got back had no thumbnail.
pub struct StalenessSweeper {
    database: Arc<dyn MusicDatabase>,
    client: Arc<dyn ArtistMetadataClient>,
    max_age: Duration,
    refreshed: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl StalenessSweeper {
    pub fn new(
        database: Arc<dyn MusicDatabase>,
        client: Arc<dyn ArtistMetadataClient>,
        max_age: Duration,
    ) -> Self {
        Self {
            database,
            client,
            max_age,
            refreshed: Mutex::new(HashMap::new()),
        }
    }

    /// Artists needing a refresh, in list order
    pub fn candidates(artists: &[Artist], now: DateTime<Utc>, max_age: Duration) -> Vec<&Artist> {
        artists
            .iter()
            .filter(|artist| artist.is_stale(now, max_age))
            .collect()
    }

    /// Refresh every stale artist in `artists`; failures are logged and skipped
    pub async fn sweep(&self, artists: &[Artist]) -> SweepReport {
        let now = Utc::now();
        let pending: Vec<Artist> = Self::candidates(artists, now, self.max_age)
            .into_iter()
            .filter(|artist| !self.recently_refreshed(&artist.id, now))
            .cloned()
            .collect();

        let mut report = SweepReport::default();
        if pending.is_empty() {
            return report;
        }
        debug!("Sweeping {} stale of {} artists", pending.len(), artists.len());

        for artist in pending {
            match self.refresh(&artist).await {
                Ok(()) => {
                    self.refreshed.lock().insert(artist.id.clone(), Utc::now());
                    report.refreshed.push(artist.id);
                }
                Err(e) => {
                    warn!("Failed to refresh artist {} ({}): {}", artist.name, artist.id, e);
                    report.failed.push(artist.id);
                }
            }
        }

        info!(
            "Artist sweep done: {} refreshed, {} failed",
            report.refreshed.len(),
            report.failed.len()
        );
        report
    }

    /// Sweep on every artist list the receiver observes until the scope closes
    ///
    /// Passes never overlap; lists published while a pass runs collapse into
    /// the latest one.
    pub fn spawn(self, scope: &ViewModelScope, mut artists: watch::Receiver<LiveResult<Artist>>) {
        scope.spawn("artist-sweeper", async move {
            loop {
                let current = artists.borrow_and_update().clone();
                if !current.is_empty() {
                    self.sweep(&current).await;
                }
                if artists.changed().await.is_err() {
                    break;
                }
            }
        });
    }

    async fn refresh(&self, artist: &Artist) -> Result<(), RefreshError> {
        let page = self.client.artist(&artist.id).await?;
        self.database.update_artist(artist, &page).await?;
        Ok(())
    }

    fn recently_refreshed(&self, id: &str, now: DateTime<Utc>) -> bool {
        self.refreshed
            .lock()
            .get(id)
            .is_some_and(|at| now - *at <= self.max_age)
    }
}
