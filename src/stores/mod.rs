//! Collaborator seams and their in-memory implementations
//!
//! The data layer, download manager and preference storage are consumed
//! through the traits here.

mod database;
mod downloads;
mod memory_db;
mod preferences;
mod snapshot;

pub use database::MusicDatabase;
pub use downloads::{DownloadTracker, MemoryDownloads};
pub use memory_db::MemoryDatabase;
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use snapshot::LibrarySnapshot;
