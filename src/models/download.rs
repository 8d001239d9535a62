//! Download status index shared by the download manager

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Lifecycle of a single download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DownloadState {
    Queued,
    Stopped,
    Downloading,
    Completed,
    Failed,
    Removing,
    Restarting,
}

/// Status of one downloaded entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadStatus {
    pub state: DownloadState,
    /// Last state change (Unix millis)
    #[serde(default)]
    pub update_time_ms: i64,
}

impl DownloadStatus {
    pub fn new(state: DownloadState, update_time_ms: i64) -> Self {
        Self {
            state,
            update_time_ms,
        }
    }

    pub fn completed(update_time_ms: i64) -> Self {
        Self::new(DownloadState::Completed, update_time_ms)
    }
}

/// Immutable snapshot of the download manager's id -> status mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadIndex(Arc<BTreeMap<String, DownloadStatus>>);

impl DownloadIndex {
    pub fn new(entries: BTreeMap<String, DownloadStatus>) -> Self {
        Self(Arc::new(entries))
    }

    pub fn get(&self, id: &str) -> Option<&DownloadStatus> {
        self.0.get(id)
    }

    /// Ids whose download has completed, in id order
    pub fn completed_ids(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, status)| status.state == DownloadState::Completed)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Completion time used for date ordering; 0 when the id is unknown
    pub fn update_time_ms(&self, id: &str) -> i64 {
        self.get(id).map(|s| s.update_time_ms).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the entries with one status replaced
    pub fn with_status(&self, id: impl Into<String>, status: DownloadStatus) -> Self {
        let mut entries = (*self.0).clone();
        entries.insert(id.into(), status);
        Self::new(entries)
    }
}

impl FromIterator<(String, DownloadStatus)> for DownloadIndex {
    fn from_iter<I: IntoIterator<Item = (String, DownloadStatus)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
