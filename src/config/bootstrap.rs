//! First-run population of the config directory from a template tree.

use std::{
    io,
    path::{Path, PathBuf},
};

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, instrument};

use crate::config_store::ConfigError;

/// Outcome of mirroring a template directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Destination files that were copied from the template.
    pub copied: Vec<PathBuf>,
    /// Destination files that already existed and were left alone.
    pub skipped: Vec<PathBuf>,
}

/// Copies every file under `template` that is missing from `destination`.
///
/// Directories are created up front; files are then copied with at most
/// `max_concurrent` copies in flight. Existing destination files are never
/// overwritten. The returned future resolves only after every copy has
/// finished, so the destination is fully populated once it completes.
///
/// A template that does not exist yields an empty report.
///
/// # Errors
/// * `ConfigError::IoError` - If the template cannot be walked, a directory
///   cannot be created, or a copy fails
#[instrument(skip_all, fields(template = %template.display(), destination = %destination.display()))]
pub async fn mirror_template(
    template: &Path,
    destination: &Path,
    max_concurrent: usize,
) -> Result<BootstrapReport, ConfigError> {
    let mut report = BootstrapReport::default();

    if !tokio::fs::try_exists(template)
        .await
        .map_err(|e| io_error(template, e))?
    {
        debug!("No template directory, nothing to copy");
        return Ok(report);
    }

    let mut pending = Vec::new();
    let mut directories = vec![template.to_path_buf()];

    while let Some(directory) = directories.pop() {
        let relative = directory.strip_prefix(template).unwrap_or(Path::new(""));
        let target_dir = destination.join(relative);

        tokio::fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| io_error(&target_dir, e))?;

        let mut entries = tokio::fs::read_dir(&directory)
            .await
            .map_err(|e| io_error(&directory, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&directory, e))?
        {
            let source = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| io_error(&source, e))?;

            if file_type.is_dir() {
                directories.push(source);
                continue;
            }

            let target = target_dir.join(entry.file_name());
            if tokio::fs::try_exists(&target)
                .await
                .map_err(|e| io_error(&target, e))?
            {
                report.skipped.push(target);
            } else {
                pending.push((source, target));
            }
        }
    }

    report.copied = stream::iter(pending)
        .map(|(source, target)| async move {
            tokio::fs::copy(&source, &target)
                .await
                .map_err(|e| io_error(&source, e))?;
            Ok::<_, ConfigError>(target)
        })
        .buffer_unordered(max_concurrent.max(1))
        .try_collect()
        .await?;

    report.copied.sort();
    report.skipped.sort();

    info!(
        copied = report.copied.len(),
        skipped = report.skipped.len(),
        "Config directory populated from template"
    );
    Ok(report)
}

/// Marker written into a config directory once its template copy completed.
pub const BOOTSTRAP_MARKER: &str = ".bootstrapped";

/// Populates `config_dir` from `template` unless an earlier run finished it.
///
/// The directory is created if needed and mirrored with [`mirror_template`].
/// Only after every copy succeeded is [`BOOTSTRAP_MARKER`] written, so a run
/// interrupted or failed half-way is retried next time; already copied files
/// are skipped then. Returns `None` when the marker was already present.
///
/// # Errors
/// * `ConfigError::IoError` - If the directory, a copy or the marker cannot be written
pub async fn bootstrap_config_dir(
    template: &Path,
    config_dir: &Path,
    max_concurrent: usize,
) -> Result<Option<BootstrapReport>, ConfigError> {
    let marker = config_dir.join(BOOTSTRAP_MARKER);

    if tokio::fs::try_exists(&marker)
        .await
        .map_err(|e| io_error(&marker, e))?
    {
        return Ok(None);
    }

    tokio::fs::create_dir_all(config_dir)
        .await
        .map_err(|e| io_error(config_dir, e))?;

    let report = mirror_template(template, config_dir, max_concurrent).await?;

    tokio::fs::write(&marker, "")
        .await
        .map_err(|e| io_error(&marker, e))?;

    Ok(Some(report))
}

fn io_error(path: &Path, error: io::Error) -> ConfigError {
    ConfigError::IoError {
        path: path.to_path_buf(),
        details: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn template() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("settings.toml"), "[editor]\nfontSize = 14\n").unwrap();
        fs::create_dir_all(dir.path().join("snippets/rust")).unwrap();
        fs::write(dir.path().join("snippets/rust/main.toml"), "a = 1\n").unwrap();
        fs::write(dir.path().join("keymap.toml"), "").unwrap();
        dir
    }

    #[tokio::test]
    async fn copies_whole_tree_into_empty_destination() {
        let template = template();
        let destination = TempDir::new().unwrap();
        let target = destination.path().join("strata");

        let report = mirror_template(template.path(), &target, 2).await.unwrap();

        assert_eq!(report.copied.len(), 3);
        assert!(report.skipped.is_empty());
        assert_eq!(
            fs::read_to_string(target.join("snippets/rust/main.toml")).unwrap(),
            "a = 1\n"
        );
        assert!(target.join("keymap.toml").exists());
    }

    #[tokio::test]
    async fn never_overwrites_existing_files() {
        let template = template();
        let destination = TempDir::new().unwrap();
        fs::write(destination.path().join("settings.toml"), "mine = true\n").unwrap();

        let report = mirror_template(template.path(), destination.path(), 1)
            .await
            .unwrap();

        assert_eq!(report.skipped, vec![destination.path().join("settings.toml")]);
        assert_eq!(report.copied.len(), 2);
        assert_eq!(
            fs::read_to_string(destination.path().join("settings.toml")).unwrap(),
            "mine = true\n"
        );
    }

    #[tokio::test]
    async fn missing_template_is_empty_report() {
        let destination = TempDir::new().unwrap();
        let report = mirror_template(&destination.path().join("nope"), destination.path(), 4)
            .await
            .unwrap();

        assert_eq!(report, BootstrapReport::default());
    }

    #[tokio::test]
    async fn bootstrap_runs_once_then_skips() {
        let template = template();
        let home = TempDir::new().unwrap();
        let config_dir = home.path().join("strata");

        let first = bootstrap_config_dir(template.path(), &config_dir, 4)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.copied.len(), 3);
        assert!(config_dir.join(BOOTSTRAP_MARKER).exists());

        fs::remove_file(config_dir.join("keymap.toml")).unwrap();
        let second = bootstrap_config_dir(template.path(), &config_dir, 4)
            .await
            .unwrap();
        assert!(second.is_none());
        assert!(!config_dir.join("keymap.toml").exists());
    }

    #[tokio::test]
    async fn unfinished_bootstrap_is_retried() {
        let template = template();
        let home = TempDir::new().unwrap();
        let config_dir = home.path().join("strata");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("settings.toml"), "[editor]\nfontSize = 14\n").unwrap();

        let report = bootstrap_config_dir(template.path(), &config_dir, 2)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.skipped, vec![config_dir.join("settings.toml")]);
        assert_eq!(report.copied.len(), 2);
        assert!(config_dir.join(BOOTSTRAP_MARKER).exists());
    }
}
