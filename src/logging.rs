use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// The returned guards must be held for as long as the process logs,
// otherwise the non blocking file writer flushes nothing.
pub fn init(level: Level, console: bool, log_file: Option<PathBuf>) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();

    let file_layer = log_file.map(|path| {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        let file_name = path.file_name().expect("log file name").to_os_string();
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        tracing_subscriber::fmt::layer()
            .with_level(true) // include levels in formatted output
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)
            .compact() // use the `Compact` formatting style.
            .with_writer(writer)
    });

    let console_layer = console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_level(true)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(file_layer)
        .with(console_layer)
        .init();
    guards
}
