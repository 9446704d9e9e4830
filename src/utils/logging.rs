use crate::models::error::SError;
use camino::Utf8Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "unmod_keeper.log";

/// Installs the global subscriber: stderr plus a daily rolling file in `log_dir`.
/// `RUST_LOG` overrides the default `info` filter. Keep the guard alive for the
/// lifetime of the process or buffered file output is lost.
pub fn init(log_dir: &Utf8Path) -> Result<WorkerGuard, SError> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| SError::IOError(format!("Failed to install log subscriber: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap().join("logs");

        let guard = init(&dir).unwrap();
        tracing::info!("logging ready");
        drop(guard);

        assert!(dir.is_dir());
        // Only one global subscriber per process.
        assert!(init(&dir).is_err());
    }
}
