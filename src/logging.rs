//! Tracing subscriber setup: console plus an optional daily log file.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "absensi-editor";

/// Default log directory (`logs/` in the platform data dir).
pub fn default_log_dir() -> PathBuf {
    ProjectDirs::from("id", "gianged", "absensi-editor")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the process exits.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let mut guard = None;
    let mut file_error = None;
    let file_layer = if config.file_enabled {
        let dir = config.directory.clone().unwrap_or_else(default_log_dir);
        match RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("log")
            .build(&dir)
        {
            Ok(appender) => {
                let (writer, worker) = tracing_appender::non_blocking(appender);
                guard = Some(worker);
                Some(fmt::layer().with_ansi(false).with_writer(writer))
            }
            Err(e) => {
                file_error = Some(format!("{}: {}", dir.display(), e));
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("File logging disabled, cannot open log directory {}", e);
    }

    guard
}
