//! Logging configuration.
//!
//! Messages go to stderr for the user and to a daily rolling file so a
//! long run can be inspected afterwards.
//!
//! Log level can be controlled via the `PHOTOMETA_LOG` environment variable:
//! - `PHOTOMETA_LOG=debug` for verbose output (same as `--verbose`)
//! - `PHOTOMETA_LOG=info` for standard output (default)
//! - `PHOTOMETA_LOG=warn` for warnings and errors only

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system. Call once at startup.
pub fn init(log_dir: &Path, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_env("PHOTOMETA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "photometa.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::debug!("Logging initialized, log files in {:?}", log_dir);
    Ok(())
}
