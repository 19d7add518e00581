use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{CategorizerError, Result};

pub const LOG_FILE_NAME: &str = "categorizer.log";

/// Builds the non-blocking JSON log writer for `dir`, creating it if needed.
pub fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir).map_err(|e| CategorizerError::io(dir, e))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initializes console logging on stderr, plus a JSON file layer when a log
/// directory is given. The returned guard flushes the file writer on drop.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taxonomy_categorizer=info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = file_writer(dir)?;
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    // stdout carries the report
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");

        let (_writer, _guard) = file_writer(&logs).unwrap();
        assert!(logs.is_dir());
        assert!(logs.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_unusable_log_dir_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = init_logging(Some(&blocker.join("logs"))).unwrap_err();
        assert!(matches!(err, CategorizerError::Io { .. }));
    }
}
