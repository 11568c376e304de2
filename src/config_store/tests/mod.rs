//! Unit tests for config_store module
//! No filesystem or timing dependencies; persistence goes to an in-memory document.

#![allow(clippy::panic, clippy::unwrap_used)]

mod path_ops;

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use toml::{Table, Value};

use crate::config_store::{ConfigError, ConfigStore, SettingsFile};

/// In-memory settings document that records every write.
#[derive(Default)]
pub(super) struct MemoryFile {
    path: PathBuf,
    contents: Mutex<Option<String>>,
    writes: Mutex<Vec<Table>>,
}

impl MemoryFile {
    pub(super) fn with_contents(contents: &str) -> Arc<Self> {
        Arc::new(Self {
            path: PathBuf::from("settings.toml"),
            contents: Mutex::new(Some(contents.to_string())),
            writes: Mutex::default(),
        })
    }

    pub(super) fn set_contents(&self, contents: &str) {
        *self.contents.lock().unwrap() = Some(contents.to_string());
    }

    pub(super) fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub(super) fn last_write(&self) -> Option<Table> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl SettingsFile for MemoryFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Table, ConfigError> {
        let contents = self.contents.lock().unwrap().clone();
        let contents = contents.ok_or_else(|| ConfigError::IoError {
            path: self.path.clone(),
            details: "missing".to_string(),
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::TomlParseError {
            location: "memory".to_string(),
            details: e.to_string(),
        })
    }

    fn write(&self, settings: &Table) -> Result<(), ConfigError> {
        self.writes.lock().unwrap().push(settings.clone());
        *self.contents.lock().unwrap() = Some(toml::to_string(settings).unwrap());
        Ok(())
    }
}

pub(super) fn table(toml_src: &str) -> Table {
    toml::from_str(toml_src).unwrap()
}

pub(super) fn editor_defaults() -> Table {
    table(
        r#"
[editor]
fontSize = 12
tabLength = 2
showInvisibles = false

[core]
themes = ["one-dark-ui", "one-dark-syntax"]
"#,
    )
}

pub(super) fn store_with(defaults: Table, user: &str) -> (ConfigStore, Arc<MemoryFile>) {
    let file = MemoryFile::with_contents(user);
    let store = ConfigStore::new(defaults, file.clone());
    store.load_user_config().unwrap();
    (store, file)
}

pub(super) fn int(i: i64) -> Value {
    Value::Integer(i)
}

pub(super) fn string(s: &str) -> Value {
    Value::String(s.to_string())
}
