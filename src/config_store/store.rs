use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use futures::Stream;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use toml::{Table, Value};
use tracing::{debug, info, instrument, warn};

use super::{
    ConfigChange, ConfigError, ObserveOptions, Subscription,
    coercion::{is_truthy, parse_int, same_value},
    file_watching::WatchHandle,
    observation::ObservationRegistry,
    path_ops::{deep_merge, set_value_at, split_key_path, value_at},
    persistence::{SettingsFile, TomlFile},
};

/// The two settings trees plus the config-file health flag.
#[derive(Debug, Default)]
pub(super) struct SettingsState {
    pub(super) defaults: Table,
    pub(super) user: Table,
    /// Set when the persisted document failed to parse; suppresses writes.
    pub(super) has_errors: bool,
}

pub(super) struct StoreInner {
    /// Held for the whole of every mutating operation, observer callbacks
    /// included. Re-entrant so callbacks may write back on the same thread.
    pub(super) operation: ReentrantMutex<()>,
    pub(super) state: RwLock<SettingsState>,
    pub(super) observers: ObservationRegistry,
    pub(super) file: Arc<dyn SettingsFile>,
    pub(super) watch: Mutex<Option<WatchHandle>>,
}

/// Layered settings store with per-path change observation.
///
/// Values resolve from the user tree first and fall back to the defaults.
/// Every effective change notifies observers and is persisted to the user
/// settings file. Cloning is cheap and every clone shares the same state, so
/// one store is constructed at startup and handed to whoever needs it.
///
/// Mutating operations and file reloads run one at a time, each to
/// completion including its observer callbacks and file save. A callback may
/// call back into the store on the thread that is running it.
#[derive(Clone)]
pub struct ConfigStore {
    pub(super) inner: Arc<StoreInner>,
}

impl ConfigStore {
    /// Creates a store seeded with `defaults` and an empty user tree.
    ///
    /// Nothing is read from `file` until [`ConfigStore::load_user_config`].
    pub fn new(defaults: Table, file: Arc<dyn SettingsFile>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                operation: ReentrantMutex::new(()),
                state: RwLock::new(SettingsState {
                    defaults,
                    ..SettingsState::default()
                }),
                observers: ObservationRegistry::default(),
                file,
                watch: Mutex::new(None),
            }),
        }
    }

    /// Opens the TOML settings file at `path`, creating an empty one if
    /// needed, and loads it over `defaults`.
    ///
    /// A malformed document does not fail the load; the store starts with an
    /// empty user tree and [`ConfigStore::has_errors`] reports the problem.
    ///
    /// # Errors
    /// * `ConfigError::PersistenceError` - If the file cannot be created
    /// * `ConfigError::IoError` - If the file cannot be read
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(defaults: Table, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = TomlFile::new(path.as_ref());
        file.ensure_exists()?;

        let store = Self::new(defaults, Arc::new(file));
        store.load_user_config()?;

        info!("Settings loaded");
        Ok(store)
    }

    /// Location of the user settings document.
    pub fn settings_path(&self) -> PathBuf {
        self.inner.file.path().to_path_buf()
    }

    /// Returns the resolved value at `path`: the user value if present,
    /// otherwise the default, otherwise `None`.
    ///
    /// The returned value is an independent copy of the stored one.
    pub fn get(&self, path: &str) -> Option<Value> {
        Self::resolve(&self.read_state(), path)
    }

    /// Returns the default value at `path`, ignoring any user override.
    pub fn get_default(&self, path: &str) -> Option<Value> {
        value_at(&self.read_state().defaults, path).cloned()
    }

    /// Reads the value at `path` as a base-10 integer.
    ///
    /// Strings are read from their leading integer prefix and floats are
    /// truncated.
    ///
    /// # Errors
    /// * `ConfigError::NotAnInteger` - If the value is absent or not numeric
    pub fn get_int(&self, path: &str) -> Result<i64, ConfigError> {
        let value = self.get(path);

        parse_int(value.as_ref()).ok_or_else(|| ConfigError::NotAnInteger {
            path: path.to_string(),
            value,
        })
    }

    /// Reads the value at `path` as a positive integer.
    ///
    /// Negative values clamp to zero, and zero or a non-integer yields
    /// `fallback`, so the result is always positive when `fallback` is.
    pub fn get_positive_int(&self, path: &str, fallback: i64) -> i64 {
        match self.get_int(path) {
            Ok(value) if value > 0 => value,
            _ => fallback,
        }
    }

    /// Sets the value at `path` and returns it.
    ///
    /// Setting the value that already resolves there does nothing. Setting a
    /// value equal to the default removes the user override instead, so later
    /// changes to the default are inherited.
    ///
    /// # Errors
    /// * `ConfigError::InvalidPath` - If the path is malformed or runs through a non-table value
    /// * `ConfigError::PersistenceError` - If the user tree cannot be saved
    #[instrument(skip_all, fields(path = %path))]
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<Value, ConfigError> {
        let value = value.into();
        split_key_path(path)?;

        let _operation = self.begin_operation();
        {
            let mut state = self.write_state();

            if same_value(Self::resolve(&state, path).as_ref(), Some(&value)) {
                return Ok(value);
            }

            let stored = if same_value(value_at(&state.defaults, path), Some(&value)) {
                None
            } else {
                Some(value.clone())
            };

            debug!(is_default = stored.is_none(), "Setting value");
            set_value_at(&mut state.user, path, stored)?;
        }

        self.update()?;
        Ok(value)
    }

    /// Removes the user override at `path` so the default applies again.
    ///
    /// # Errors
    /// * `ConfigError::InvalidPath` - If the path is malformed
    /// * `ConfigError::PersistenceError` - If the user tree cannot be saved
    pub fn unset(&self, path: &str) -> Result<(), ConfigError> {
        let _operation = self.begin_operation();
        {
            let mut state = self.write_state();
            split_key_path(path)?;

            if value_at(&state.user, path).is_none() {
                return Ok(());
            }

            set_value_at(&mut state.user, path, None)?;
        }

        self.update()
    }

    /// Flips the truthiness of the value at `path` and returns the new boolean.
    ///
    /// # Errors
    /// Same as [`ConfigStore::set`].
    pub fn toggle(&self, path: &str) -> Result<bool, ConfigError> {
        let _operation = self.begin_operation();
        let value = !is_truthy(self.get(path).as_ref());
        self.set(path, value)?;
        Ok(value)
    }

    /// Appends `value` to the array at `path` and returns the new length.
    ///
    /// An absent path is treated as an empty array.
    ///
    /// # Errors
    /// * `ConfigError::TypeMismatch` - If the current value is not an array
    /// * Any error from [`ConfigStore::set`]
    pub fn push_at_key_path(
        &self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<usize, ConfigError> {
        let _operation = self.begin_operation();
        let mut array = self.array_at(path)?;
        array.push(value.into());

        let len = array.len();
        self.set(path, array)?;
        Ok(len)
    }

    /// Prepends `value` to the array at `path` and returns the new length.
    ///
    /// # Errors
    /// Same as [`ConfigStore::push_at_key_path`].
    pub fn unshift_at_key_path(
        &self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<usize, ConfigError> {
        let _operation = self.begin_operation();
        let mut array = self.array_at(path)?;
        array.insert(0, value.into());

        let len = array.len();
        self.set(path, array)?;
        Ok(len)
    }

    /// Removes every element equal to `value` from the array at `path` and
    /// returns the resulting array.
    ///
    /// # Errors
    /// Same as [`ConfigStore::push_at_key_path`].
    pub fn remove_at_key_path(
        &self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<Value>, ConfigError> {
        let value = value.into();
        let _operation = self.begin_operation();
        let mut array = self.array_at(path)?;
        array.retain(|element| !same_value(Some(element), Some(&value)));

        self.set(path, array.clone())?;
        Ok(array)
    }

    /// Deep-merges `partial` into the defaults at `path`.
    ///
    /// Keys named in `partial` replace the existing defaults; every other
    /// default is kept. An empty `path` merges at the root.
    ///
    /// # Errors
    /// * `ConfigError::InvalidPath` - If the path is malformed or runs through a non-table default
    /// * `ConfigError::PersistenceError` - If the user tree cannot be saved
    pub fn set_defaults(&self, path: &str, partial: Table) -> Result<(), ConfigError> {
        let _operation = self.begin_operation();
        {
            let mut state = self.write_state();

            if path.is_empty() {
                let defaults = std::mem::take(&mut state.defaults);
                state.defaults = deep_merge(defaults, partial);
            } else {
                let existing = match value_at(&state.defaults, path) {
                    None => Table::new(),
                    Some(Value::Table(table)) => table.clone(),
                    Some(other) => {
                        return Err(ConfigError::InvalidPath(format!(
                            "Cannot merge defaults into {} at path '{path}'",
                            other.type_str()
                        )));
                    }
                };

                let merged = deep_merge(existing, partial);
                set_value_at(&mut state.defaults, path, Some(Value::Table(merged)))?;
            }
        }

        self.update()
    }

    /// Returns the combined settings: every default, overridden by user values.
    pub fn get_settings(&self) -> Table {
        let state = self.read_state();
        deep_merge(state.defaults.clone(), state.user.clone())
    }

    /// Whether the persisted document failed to parse on the last load.
    ///
    /// While set, changes stay in memory and are neither saved nor announced.
    pub fn has_errors(&self) -> bool {
        self.read_state().has_errors
    }

    /// Announces a change and saves the user tree.
    ///
    /// Observers run first, then the file is written. Does nothing while the
    /// settings file has errors.
    ///
    /// # Errors
    /// * `ConfigError::SerializationError` - If the user tree cannot be encoded
    /// * `ConfigError::PersistenceError` - If the settings file cannot be written
    pub fn update(&self) -> Result<(), ConfigError> {
        let _operation = self.begin_operation();
        if self.has_errors() {
            debug!("Settings file has errors, skipping update");
            return Ok(());
        }

        self.emit_updated();

        let user = self.read_state().user.clone();
        self.inner.file.write(&user).inspect_err(|e| {
            warn!(error = %e, "Failed to save settings");
        })
    }

    /// Observes the resolved value at `path`.
    ///
    /// Unless `options.call_now` is false, `callback` runs once with the
    /// current value before this returns. Afterwards it runs once for every
    /// change of the resolved value, carrying the value it last saw.
    pub fn observe<F>(&self, path: &str, options: ObserveOptions, callback: F) -> Subscription
    where
        F: Fn(&ConfigChange) + Send + Sync + 'static,
    {
        let _operation = self.begin_operation();
        let current = self.get(path);

        if options.call_now {
            callback(&ConfigChange::initial(path.to_string(), current.clone()));
        }

        self.inner.observers.observe(path, current, Arc::new(callback))
    }

    /// Removes every observer registered for exactly `path`.
    pub fn unobserve(&self, path: &str) {
        self.inner.observers.unobserve(path);
    }

    /// Runs `callback` on every announced change, whichever path it touched.
    pub fn on_did_update<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.observers.on_did_update(Arc::new(callback))
    }

    /// Creates a stream of changes to the resolved value at `path`.
    ///
    /// The stream does not yield the current value. Dropping the stream ends
    /// the observation.
    pub fn subscribe_to_path(&self, path: &str) -> impl Stream<Item = ConfigChange> + use<> {
        let (tx, rx) = mpsc::unbounded_channel();

        let subscription = self.observe(path, ObserveOptions { call_now: false }, move |change| {
            let _ = tx.send(change.clone());
        });

        futures::stream::unfold(
            (UnboundedReceiverStream::new(rx), subscription),
            |(mut changes, subscription)| async move {
                use futures::StreamExt;

                let change = changes.next().await?;
                Some((change, (changes, subscription)))
            },
        )
    }

    pub(super) fn emit_updated(&self) {
        let store = self.clone();
        self.inner
            .observers
            .notify_updated(move |path| store.get(path));
    }

    /// Serialises mutating operations, file reloads included.
    pub(super) fn begin_operation(&self) -> ReentrantMutexGuard<'_, ()> {
        self.inner.operation.lock()
    }

    pub(super) fn read_state(&self) -> RwLockReadGuard<'_, SettingsState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn write_state(&self) -> RwLockWriteGuard<'_, SettingsState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(state: &SettingsState, path: &str) -> Option<Value> {
        value_at(&state.user, path)
            .or_else(|| value_at(&state.defaults, path))
            .cloned()
    }

    fn array_at(&self, path: &str) -> Result<Vec<Value>, ConfigError> {
        match self.get(path) {
            None => Ok(Vec::new()),
            Some(Value::Array(array)) => Ok(array),
            Some(other) => Err(ConfigError::TypeMismatch {
                path: path.to_string(),
                expected_type: "array",
                actual_value: Some(other),
            }),
        }
    }
}
