use std::{env, error::Error, io};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{Builder, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::ConfigPaths;

const LOG_FORMAT_VAR: &str = "STRATA_LOG_FORMAT";
const DAYS_TO_KEEP: usize = 7;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console and file output style, chosen with `STRATA_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match env::var(LOG_FORMAT_VAR).as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Pretty,
        }
    }

    fn console_layer(self) -> BoxedLayer {
        match self {
            Self::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_writer(io::stdout)
                .boxed(),
            Self::Pretty => fmt::layer()
                .pretty()
                .with_target(true)
                .with_level(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .boxed(),
        }
    }

    fn file_layer<W>(self, writer: W) -> BoxedLayer
    where
        W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        match self {
            Self::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_writer(writer)
                .with_ansi(false)
                .boxed(),
            Self::Pretty => fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(writer)
                .with_ansi(false)
                .boxed(),
        }
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize tracing for long-running use of the store
///
/// Logs at info level unless `RUST_LOG` says otherwise, pretty-printed or as
/// JSON depending on `STRATA_LOG_FORMAT`.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init() -> Result<(), Box<dyn Error>> {
    let layers = vec![LogFormat::from_env().console_layer()];

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter("info"))
        .try_init()?;

    Ok(())
}

/// Initialize tracing for one-shot CLI commands
///
/// Only warnings and errors are logged, compactly and to stderr, so command
/// output on stdout stays clean. RUST_LOG still overrides the level.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init_cli_mode() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init()?;

    Ok(())
}

/// Initialize tracing with file output
///
/// Like [`init`], plus a daily-rotated log file in the strata log directory.
/// Only the last week of files is kept. File output is flushed for as long
/// as the returned guard is alive.
///
/// # Errors
/// Returns error if the log directory or appender cannot be created, or a
/// global subscriber is already installed
pub fn init_with_file() -> Result<WorkerGuard, Box<dyn Error>> {
    let log_dir = ConfigPaths::log_dir()?;

    let file_appender = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("strata")
        .filename_suffix("log")
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let format = LogFormat::from_env();
    let layers = vec![format.console_layer(), format.file_layer(non_blocking)];

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter("info"))
        .try_init()?;

    Ok(guard)
}
