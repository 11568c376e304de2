use std::{path::PathBuf, time::Instant};

use toml::Value;

/// A change to the resolved value at one observed key path.
///
/// Delivered to observation callbacks. The first delivery of a subscription
/// created with `call_now` has `initial` set and no previous value; every
/// later delivery reports the value the subscription saw before the change.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigChange {
    /// Path to the observed field using dot notation (e.g., "editor.fontSize").
    pub path: String,
    /// The resolved value before the change, `None` if it was absent.
    pub old_value: Option<Value>,
    /// The resolved value after the change, `None` if it is now absent.
    pub new_value: Option<Value>,
    /// Whether this is the immediate delivery made when observation started.
    pub initial: bool,
    /// Timestamp when the change was observed.
    pub timestamp: Instant,
}

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The key path is empty, has an empty segment, or cannot be written.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// The value type does not match the expected type for the field.
    #[error("Type mismatch at {path}: Expected {expected_type}, got {actual_value:?}")]
    TypeMismatch {
        /// The path where the type mismatch occurred.
        path: String,
        /// The expected type name.
        expected_type: &'static str,
        /// The actual value that was found, if any.
        actual_value: Option<Value>,
    },

    /// The stored value cannot be read as a base-10 integer.
    #[error("value at '{path}' is not an integer: {value:?}")]
    NotAnInteger {
        /// The path that was coerced
        path: String,
        /// The value found there, if any
        value: Option<Value>,
    },

    /// Error occurred while persisting configuration to disk
    #[error("failed to persist config to '{path}': {details}")]
    PersistenceError {
        /// Path where persistence failed
        path: PathBuf,
        /// Error details from the persistence operation
        details: String,
    },

    /// Error occurred while serializing configuration
    #[error("failed to serialize {content_type}: {details}")]
    SerializationError {
        /// Type of content being serialized (e.g., "settings")
        content_type: String,
        /// Serialization error details
        details: String,
    },

    /// Failed to parse TOML content
    #[error("failed to parse TOML from {location}: {details}")]
    TomlParseError {
        /// Location of the TOML (file path, "string", etc.)
        location: String,
        /// Parse error details
        details: String,
    },

    /// Failed to initialize file watcher
    #[error("failed to initialize file watcher: {details}")]
    FileWatcherInitError {
        /// File watcher initialization error details
        details: String,
    },

    /// Error occurred while watching a specific file
    #[error("file watcher error for '{path}': {details}")]
    FileWatchError {
        /// Path being watched when error occurred
        path: PathBuf,
        /// File watcher error details
        details: String,
    },

    /// Error occurred during file I/O operations
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// A required service is unavailable
    #[error("{service} service unavailable: {details}")]
    ServiceUnavailable {
        /// Name of the service that is unavailable
        service: String,
        /// Details about why the service is unavailable
        details: String,
    },
}

impl ConfigChange {
    /// Creates a change describing a transition between two resolved values.
    ///
    /// # Arguments
    ///
    /// * `path` - The dot-separated path that was observed
    /// * `old_value` - The previous resolved value
    /// * `new_value` - The new resolved value
    pub fn new(path: String, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        Self {
            path,
            old_value,
            new_value,
            initial: false,
            timestamp: Instant::now(),
        }
    }

    /// Creates the immediate delivery made when an observation starts.
    pub fn initial(path: String, value: Option<Value>) -> Self {
        Self {
            initial: true,
            ..Self::new(path, None, value)
        }
    }

    /// Extracts the new value as a specific type.
    ///
    /// This method attempts to deserialize the new value into the requested type.
    /// It provides type safety when extracting configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TypeMismatch` if the value is absent or cannot be
    /// deserialized into the requested type.
    pub fn extract<T>(&self) -> Result<T, ConfigError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mismatch = || ConfigError::TypeMismatch {
            path: self.path.clone(),
            expected_type: std::any::type_name::<T>(),
            actual_value: self.new_value.clone(),
        };

        let value = self.new_value.clone().ok_or_else(mismatch)?;
        value.try_into().map_err(|_| mismatch())
    }

    /// Attempts to extract the new value as a string.
    ///
    /// Returns `None` if the value is absent or not a string.
    pub fn as_string(&self) -> Option<String> {
        match &self.new_value {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Extracts the new value as a string with a fallback default.
    pub fn as_string_or(&self, default: &str) -> String {
        self.as_string().unwrap_or_else(|| default.to_string())
    }
}
