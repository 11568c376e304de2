use std::{
    fs,
    path::{Path, PathBuf},
};

use toml::Table;
use tracing::debug;

use super::ConfigError;

/// Storage for the user settings document.
///
/// The store only needs whole-document reads and writes; how the document is
/// encoded is up to the implementation.
pub trait SettingsFile: Send + Sync {
    /// Location of the document, used for watching and diagnostics.
    fn path(&self) -> &Path;

    /// Reads and parses the whole document.
    ///
    /// # Errors
    /// * `ConfigError::IoError` - If the document cannot be read
    /// * `ConfigError::TomlParseError` - If the document is malformed
    fn read(&self) -> Result<Table, ConfigError>;

    /// Replaces the document with `settings`.
    ///
    /// # Errors
    /// * `ConfigError::SerializationError` - If the tree cannot be encoded
    /// * `ConfigError::PersistenceError` - If the document cannot be written
    fn write(&self, settings: &Table) -> Result<(), ConfigError>;
}

/// A settings document stored as a TOML file.
#[derive(Debug, Clone)]
pub struct TomlFile {
    path: PathBuf,
}

impl TomlFile {
    /// Creates a handle for the TOML file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates an empty document (and its parent directories) if none exists
    ///
    /// # Errors
    /// * `ConfigError::PersistenceError` - If the directory or file cannot be created
    pub fn ensure_exists(&self) -> Result<(), ConfigError> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::PersistenceError {
                path: parent.to_path_buf(),
                details: format!("Failed to create config directory: {e}"),
            })?;
        }

        debug!(path = %self.path.display(), "Creating empty settings file");
        fs::write(&self.path, "").map_err(|e| ConfigError::PersistenceError {
            path: self.path.clone(),
            details: format!("Failed to create settings file: {e}"),
        })
    }
}

impl SettingsFile for TomlFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Table, ConfigError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ConfigError::IoError {
            path: self.path.clone(),
            details: format!("Failed to read settings file: {e}"),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            location: self.path.to_string_lossy().to_string(),
            details: e.to_string(),
        })
    }

    fn write(&self, settings: &Table) -> Result<(), ConfigError> {
        let toml_str =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::SerializationError {
                content_type: "settings".to_string(),
                details: e.to_string(),
            })?;

        let temp_path = self.path.with_extension("tmp");

        fs::write(&temp_path, toml_str).map_err(|e| ConfigError::PersistenceError {
            path: temp_path.clone(),
            details: e.to_string(),
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| ConfigError::PersistenceError {
            path: self.path.clone(),
            details: e.to_string(),
        })
    }
}
