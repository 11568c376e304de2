use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};
use tokio::sync::mpsc;

use super::ConfigError;

/// Represents a file system event for a watched file.
#[derive(Debug, Clone)]
pub struct FileEvent {
    /// The path of the file that changed
    pub path: PathBuf,
    /// The type of change that occurred
    pub kind: FileEventKind,
}

/// The type of file system change that occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum FileEventKind {
    /// File contents changed, or the file was replaced by a rename
    Changed,
    /// File was removed
    Removed,
}

/// Watches a single file for changes.
///
/// The parent directory is watched rather than the file itself, so the watch
/// survives editors and writers that save by renaming a temporary file over
/// the original. Events for other entries in that directory are dropped.
/// Dropping the watcher stops delivery.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    directory: PathBuf,
}

impl FileWatcher {
    /// Starts watching `path` and returns the watcher and its event receiver.
    ///
    /// Uses an unbounded channel since file events are typically infrequent but bursty.
    ///
    /// # Errors
    /// * `ConfigError::FileWatcherInitError` - If the platform watcher cannot be created
    /// * `ConfigError::FileWatchError` - If the file's directory cannot be watched
    pub fn watch(
        path: impl AsRef<Path>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<FileEvent>), ConfigError> {
        let path = path.as_ref();
        let watch_error = |details: String| ConfigError::FileWatchError {
            path: path.to_path_buf(),
            details,
        };

        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| watch_error("Path has no file name".to_string()))?
            .to_os_string();
        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };

            let kind = match event.kind {
                EventKind::Create(_) | EventKind::Modify(_) => FileEventKind::Changed,
                EventKind::Remove(_) => FileEventKind::Removed,
                _ => return,
            };

            for path in event.paths {
                if path.file_name() != Some(file_name.as_os_str()) {
                    continue;
                }

                let _ = event_tx.send(FileEvent {
                    path,
                    kind: kind.clone(),
                });
            }
        })
        .map_err(|e| ConfigError::FileWatcherInitError {
            details: e.to_string(),
        })?;

        watcher
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|e| watch_error(e.to_string()))?;

        Ok((Self { watcher, directory }, event_rx))
    }

    /// Stops watching. Events already queued may still be received.
    pub fn close(mut self) {
        let _ = self.watcher.unwatch(&self.directory);
    }
}
