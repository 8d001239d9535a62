//! Downloaded songs: join the download index with the store, then sort

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::debug;

use super::SortLib;
use crate::engine::{LiveQuery, PipelineExt};
use crate::models::{DownloadIndex, Song, SongSortType};
use crate::stores::MusicDatabase;

/// Live list of completed downloads in the requested order
///
/// Every index emission re-fetches exactly the completed ids from the store
/// and sorts the result in full; the previous fetch is dropped. Store changes
/// re-sort against the index snapshot that selected the ids.
pub fn downloaded_songs(
    database: Arc<dyn MusicDatabase>,
    downloads: BoxStream<'static, DownloadIndex>,
    sort: SongSortType,
    descending: bool,
) -> LiveQuery<Vec<Song>> {
    downloads
        .switch_latest(move |index: DownloadIndex| {
            let ids = index.completed_ids();
            debug!(
                "Download index changed: {} entries, {} completed",
                index.len(),
                ids.len()
            );
            database
                .songs_by_ids(ids)
                .map(move |songs| {
                    songs.map(|songs| SortLib::sort_downloaded(songs, &index, sort, descending))
                })
                .boxed()
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DownloadState, DownloadStatus};
    use crate::stores::{DownloadTracker, LibrarySnapshot, MemoryDatabase, MemoryDownloads};

    fn titles(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    fn setup() -> (Arc<MemoryDatabase>, MemoryDownloads) {
        let db = Arc::new(MemoryDatabase::new(LibrarySnapshot {
            songs: vec![
                Song::new("id1", "Beta"),
                Song::new("id2", "Alpha"),
                Song::new("id3", "Gamma"),
            ],
            ..Default::default()
        }));
        let downloads = MemoryDownloads::default();
        downloads.set_status("id1", DownloadStatus::completed(500));
        downloads.set_status("id2", DownloadStatus::new(DownloadState::Downloading, 900));
        downloads.set_status("id3", DownloadStatus::completed(200));
        (db, downloads)
    }

    #[tokio::test]
    async fn test_only_completed_downloads_are_listed() {
        let (db, downloads) = setup();
        let mut songs = downloaded_songs(db, downloads.downloads(), SongSortType::Name, false);
        let first = songs.next().await.unwrap().unwrap();
        assert_eq!(titles(&first), vec!["Beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_sorted_by_completion_time() {
        let (db, downloads) = setup();
        let mut asc = downloaded_songs(db.clone(), downloads.downloads(), SongSortType::CreateDate, false);
        assert_eq!(titles(&asc.next().await.unwrap().unwrap()), vec!["Gamma", "Beta"]);

        let mut desc = downloaded_songs(db, downloads.downloads(), SongSortType::CreateDate, true);
        assert_eq!(titles(&desc.next().await.unwrap().unwrap()), vec!["Beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_same_index_twice_gives_same_output() {
        let (db, downloads) = setup();
        let mut songs = downloaded_songs(db, downloads.downloads(), SongSortType::Name, true);
        let first = songs.next().await.unwrap().unwrap();

        downloads.republish();
        let second = songs.next().await.unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_index_change_refetches_and_releases_old_query() {
        let (db, downloads) = setup();
        let mut songs = downloaded_songs(db.clone(), downloads.downloads(), SongSortType::Name, false);
        songs.next().await.unwrap().unwrap();
        assert_eq!(db.active_queries(), 1);

        downloads.set_status("id2", DownloadStatus::completed(1000));
        let updated = songs.next().await.unwrap().unwrap();
        assert_eq!(titles(&updated), vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(db.active_queries(), 1);

        drop(songs);
        assert_eq!(db.active_queries(), 0);
    }
}
