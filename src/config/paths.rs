//! Path management for tunedeck
//!
//! Resolves where settings, stored preferences and the library fixture live.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Filesystem locations used by the CLI
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory path
    config_dir: PathBuf,
}

impl Paths {
    /// Resolve the config directory and make sure it exists
    ///
    /// An explicit override wins; otherwise the platform config directory is used,
    /// falling back to `./tunedeck` when the platform has none.
    pub fn new(config_override: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_override {
            Some(path) => path,
            None => directories::ProjectDirs::from("", "", "tunedeck")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("tunedeck")),
        };

        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory {}", config_dir.display())
        })?;

        Ok(Self { config_dir })
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    /// Get the stored preferences path
    pub fn preferences_path(&self) -> PathBuf {
        self.config_dir.join("preferences.json")
    }

    /// Get the default library fixture path
    pub fn library_path(&self) -> PathBuf {
        self.config_dir.join("library.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_creation() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("nested").join("tunedeck");

        let paths = Paths::new(Some(config.clone())).unwrap();

        assert!(paths.config_dir().exists());
        assert_eq!(paths.preferences_path(), config.join("preferences.json"));
        assert_eq!(paths.settings_path(), config.join("settings.toml"));
    }
}
