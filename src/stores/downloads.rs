//! Download manager seam: the live download status index

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::models::{DownloadIndex, DownloadStatus};

/// Source of download status snapshots
pub trait DownloadTracker: Send + Sync + 'static {
    /// Emits the current index on subscribe and after every change
    fn downloads(&self) -> BoxStream<'static, DownloadIndex>;
}

/// Download index kept in memory
#[derive(Debug)]
pub struct MemoryDownloads {
    tx: watch::Sender<DownloadIndex>,
}

impl Default for MemoryDownloads {
    fn default() -> Self {
        Self::new(DownloadIndex::default())
    }
}

impl MemoryDownloads {
    pub fn new(index: DownloadIndex) -> Self {
        let (tx, _) = watch::channel(index);
        Self { tx }
    }

    pub fn set_status(&self, id: impl Into<String>, status: DownloadStatus) {
        let id = id.into();
        self.tx.send_modify(|index| *index = index.with_status(id, status));
    }

    /// Notify subscribers again without changing anything
    pub fn republish(&self) {
        self.tx.send_modify(|_| {});
    }
}

impl DownloadTracker for MemoryDownloads {
    fn downloads(&self) -> BoxStream<'static, DownloadIndex> {
        WatchStream::new(self.tx.subscribe()).boxed()
    }
}
