//! Configuration module for tunedeck
//!
//! Engine settings and path management.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Settings, SharingPolicy};

/// Metadata older than this is refreshed by the staleness sweep
pub const DEFAULT_ARTIST_MAX_AGE_DAYS: i64 = 10;

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "TUNEDECK";
