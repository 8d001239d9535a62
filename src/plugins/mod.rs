//! Plugins that reach outside the process
//!
//! Currently only the artist metadata client used by the staleness sweep.

pub mod metadata;

pub use metadata::{ArtistMetadataClient, HttpMetadataClient};
