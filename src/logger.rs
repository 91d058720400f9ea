use chrono::Local;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize logging into a per-session file under `<app_dir>/logs`.
/// Nothing goes to the console; the terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_logger(app_dir: &Path, level: &str) -> std::io::Result<WorkerGuard> {
    let log_dir = app_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let session_file = format!("session-{}.log", Local::now().format("%Y%m%d-%H%M%S"));
    let appender = tracing_appender::rolling::never(&log_dir, session_file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // RUST_LOG wins over the command-line level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("wallet_challenge_lib={level},wallet_challenge_tui={level},warn", level = level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(guard)
}
