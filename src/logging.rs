//! Tracing setup. Logs go to a daily-rotated file under the platform data
//! dir so they never interleave with anything written to stdout. Filtering
//! follows `RUST_LOG`, defaulting to `info`.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("webpen").join("logs"))
}

/// Install the global subscriber. Returns the appender guard, which must be
/// held for the lifetime of the process, or `None` when setup fails (no
/// data dir, or a subscriber is already installed) — the session runs fine
/// without logging.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(&dir, "webpen.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .ok()?;

    Some(guard)
}
