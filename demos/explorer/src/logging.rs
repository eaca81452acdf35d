//! File logging; the terminal belongs to the UI

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Non-blocking writer appending to `path`
///
/// Lines are written on a background thread; they are flushed when the
/// guard is dropped.
pub fn file_writer(path: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a log file path: {}", path.display()),
            )
        })?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(io::Error::other)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber; keep the guard alive until exit
pub fn init(path: &Path) -> io::Result<WorkerGuard> {
    let (writer, guard) = file_writer(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    tracing::info!(path = %path.display(), "Logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_writer_flushes_on_guard_drop() {
        let dir = std::env::temp_dir().join(format!("explorer-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("explorer.log");

        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"registry initialized\n").unwrap();
        drop(guard);

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "registry initialized\n"
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_path_without_file_name() {
        let err = file_writer(Path::new("/")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
