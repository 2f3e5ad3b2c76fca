//! File system operations.

use std::path::{Path, PathBuf};

use anyhow::Context;

pub mod settings;

pub use settings::{PersistedSettings, load_settings, save_settings};

/// Default configuration directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = ".textclf";

const SETTINGS_FILE_NAME: &str = "settings.json";
const LOG_FILE_NAME: &str = "textclf.log";

/// Holds the textclf paths derived from the configuration directory.
///
/// Tests point this at a temporary directory instead of the working
/// directory.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use textclf::fs::AppPaths;
///
/// let paths = AppPaths::new(Path::new("/tmp/test/.textclf"));
/// assert_eq!(paths.settings_file(), Path::new("/tmp/test/.textclf/settings.json"));
/// ```
#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// Creates paths rooted at the given configuration directory.
    #[must_use]
    pub fn new(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
        }
    }

    /// Returns the configuration directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the settings file path (`<config>/settings.json`).
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Returns the log file path (`<config>/textclf.log`).
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.config_dir.join(LOG_FILE_NAME)
    }

    /// Ensures the configuration directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> anyhow::Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir).with_context(|| {
                format!("Failed to create directory: {}", self.config_dir.display())
            })?;
        }
        Ok(())
    }

    /// Loads settings from the settings file.
    ///
    /// If the file doesn't exist, returns default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_settings(&self) -> anyhow::Result<PersistedSettings> {
        load_settings(&self.settings_file())
    }

    /// Saves settings, creating the configuration directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save_settings(&self, settings: &PersistedSettings) -> anyhow::Result<()> {
        self.ensure_config_dir()?;
        save_settings(&self.settings_file(), settings)
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_CONFIG_DIR))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_are_derived_from_config_dir() {
        let paths = AppPaths::new(Path::new("/test/base/.textclf"));

        assert_eq!(paths.config_dir(), Path::new("/test/base/.textclf"));
        assert_eq!(
            paths.settings_file(),
            Path::new("/test/base/.textclf/settings.json")
        );
        assert_eq!(paths.log_file(), Path::new("/test/base/.textclf/textclf.log"));
    }

    #[test]
    fn default_is_relative_to_working_directory() {
        assert_eq!(AppPaths::default().config_dir(), Path::new(".textclf"));
    }

    #[test]
    fn ensure_config_dir_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::new(&temp.path().join("nested/.textclf"));

        assert!(!paths.config_dir().exists());
        paths.ensure_config_dir().unwrap();
        assert!(paths.config_dir().exists());
        // Second call is a no-op.
        paths.ensure_config_dir().unwrap();
    }

    #[test]
    fn save_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::new(&temp.path().join(".textclf"));

        paths.save_settings(&PersistedSettings::default()).unwrap();

        assert!(paths.settings_file().exists());
    }
}
