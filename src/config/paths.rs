use std::{
    env,
    io::{Error, ErrorKind},
    path::PathBuf,
};

/// Utility struct for managing configuration file paths
///
/// Provides methods to locate configuration directories and files following
/// the XDG Base Directory specification
pub struct ConfigPaths;

impl ConfigPaths {
    /// Returns the configuration directory path for the application
    ///
    /// Resolution order:
    /// - `STRATA_CONFIG_DIR`, used as-is
    /// - `$XDG_CONFIG_HOME/strata`
    /// - `$HOME/.config/strata`
    ///
    /// # Errors
    /// Returns an error if none of the environment variables above are set
    pub fn config_dir() -> Result<PathBuf, Error> {
        if let Ok(dir) = env::var("STRATA_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let config_home = env::var("XDG_CONFIG_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.config")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(config_home).join("strata"))
    }

    /// Returns the directory holding the template copied into a fresh config directory
    ///
    /// Uses `$XDG_DATA_HOME/strata/template`, falling back to
    /// `$HOME/.local/share/strata/template`.
    ///
    /// # Errors
    /// Returns an error if neither `XDG_DATA_HOME` nor `HOME` is set
    pub fn template_dir() -> Result<PathBuf, Error> {
        let data_home = env::var("XDG_DATA_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.local/share")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_DATA_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(data_home).join("strata").join("template"))
    }

    /// Get the application log directory
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if HOME is not set or the directory cannot be created
    pub fn log_dir() -> Result<PathBuf, Error> {
        let home = env::var("HOME")
            .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not found"))?;
        let log_dir = PathBuf::from(home).join(".strata").join("logs");

        if !log_dir.exists() {
            std::fs::create_dir_all(&log_dir)?;
        }

        Ok(log_dir)
    }

    /// Returns the path to the user settings file
    ///
    /// # Errors
    /// Returns an error if the configuration directory cannot be determined
    pub fn settings_file() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("settings.toml"))
    }
}
