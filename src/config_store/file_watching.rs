use std::sync::{MutexGuard, PoisonError, Weak};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info, instrument, warn};

use super::{
    ConfigError, ConfigStore,
    file_watcher::{FileEventKind, FileWatcher},
    coercion::same_table,
    store::StoreInner,
};

/// A live watch on the settings file: the platform watcher plus the task
/// that turns its events into reloads.
pub(super) struct WatchHandle {
    watcher: FileWatcher,
    task: JoinHandle<()>,
}

impl WatchHandle {
    fn close(self) {
        self.watcher.close();
        self.task.abort();
    }
}

impl ConfigStore {
    /// Reads the settings file and makes it the user tree.
    ///
    /// The document replaces the in-memory tree, so keys removed from the
    /// file by hand are gone from the store too and are not written back by
    /// the next change. On success the error flag is cleared and observers
    /// are notified if the user tree changed. A malformed document sets the
    /// error flag, keeps the current tree and is only logged; the caller
    /// never sees it.
    ///
    /// Runs as one store operation: a write in progress on another thread,
    /// its observer callbacks and file save included, finishes before the
    /// file is read.
    ///
    /// # Errors
    /// * `ConfigError::IoError` - If the file cannot be read
    #[instrument(skip(self), fields(path = %self.inner.file.path().display()))]
    pub fn load_user_config(&self) -> Result<(), ConfigError> {
        let _operation = self.begin_operation();

        let loaded = match self.inner.file.read() {
            Ok(table) => table,
            Err(e @ ConfigError::TomlParseError { .. }) => {
                warn!(error = %e, "Settings file has errors, keeping current settings");
                self.write_state().has_errors = true;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let changed = {
            let mut state = self.write_state();
            let changed = !same_table(&loaded, &state.user);

            state.user = loaded;
            state.has_errors = false;
            changed
        };

        if changed {
            debug!("Settings file changed, notifying observers");
            self.emit_updated();
        }

        Ok(())
    }

    /// Starts reloading the settings file whenever it changes on disk.
    ///
    /// Calling this while already watching does nothing. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    /// * `ConfigError::ServiceUnavailable` - If no Tokio runtime is running
    /// * `ConfigError::FileWatcherInitError` / `ConfigError::FileWatchError` - If watching fails
    #[instrument(skip(self), fields(path = %self.inner.file.path().display()))]
    pub fn observe_user_config(&self) -> Result<(), ConfigError> {
        let mut watch = self.lock_watch();
        if watch.is_some() {
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|e| ConfigError::ServiceUnavailable {
            service: "file watching".to_string(),
            details: e.to_string(),
        })?;

        let (watcher, mut event_rx) = FileWatcher::watch(self.inner.file.path())?;
        let weak_inner = std::sync::Arc::downgrade(&self.inner);

        let task = runtime.spawn(async move {
            while let Some(event) = event_rx.recv().await {
                if event.kind != FileEventKind::Changed {
                    continue;
                }

                let Some(store) = upgrade(&weak_inner) else {
                    break;
                };

                // Checked before every reload: teardown clears the handle
                // before the watcher stops delivering events.
                if !store.is_watching() {
                    break;
                }

                // Waits for any in-flight store operation, so keep it off the
                // async workers.
                match tokio::task::spawn_blocking(move || store.load_user_config()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(error = %e, "Failed to reload settings"),
                    Err(e) => warn!(error = %e, "Settings reload task failed"),
                }
            }
        });

        info!("Watching settings file");
        *watch = Some(WatchHandle { watcher, task });
        Ok(())
    }

    /// Stops watching the settings file. Safe to call when not watching.
    pub fn unobserve_user_config(&self) {
        let handle = self.lock_watch().take();

        if let Some(handle) = handle {
            debug!("Stopped watching settings file");
            handle.close();
        }
    }

    /// Whether the settings file is currently being watched.
    pub fn is_watching(&self) -> bool {
        self.lock_watch().is_some()
    }

    fn lock_watch(&self) -> MutexGuard<'_, Option<WatchHandle>> {
        self.inner
            .watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn upgrade(inner: &Weak<StoreInner>) -> Option<ConfigStore> {
    inner.upgrade().map(|inner| ConfigStore { inner })
}
