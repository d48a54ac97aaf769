use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tokio::task;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const SECONDS_PER_DAY: u64 = 60 * 60 * 24;
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Keeps the file writer flushing; drop it only on shutdown
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

fn normalize_level(level: &str) -> &'static str {
    let lower = level.trim().to_lowercase();
    VALID_LEVELS
        .iter()
        .copied()
        .find(|l| *l == lower)
        .unwrap_or("info")
}

/// Console (ANSI) plus daily rolling file output. `RUST_LOG` directives
/// take precedence over `level`. Must be called inside a tokio runtime.
pub fn init_logging(
    log_dir: impl AsRef<Path>,
    prefix: &str,
    level: &str,
    retention_days: u64,
) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let effective_level = normalize_level(level);

    let builder = EnvFilter::builder().with_default_directive(
        effective_level
            .parse()
            .with_context(|| format!("Invalid log level '{}'", effective_level))?,
    );

    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create file appender")?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if !VALID_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    start_log_cleanup_task(log_dir, prefix.to_string(), retention_max_age(retention_days));

    Ok(LoggerGuard(guard))
}

fn retention_max_age(retention_days: u64) -> Duration {
    Duration::from_secs(SECONDS_PER_DAY.saturating_mul(retention_days))
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String, max_age: Duration) {
    task::spawn(async move {
        loop {
            if let Err(e) = cleanup_old_logs(&log_dir, &prefix, max_age) {
                tracing::warn!("Failed to delete old log file: {}", e);
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// Remove `<prefix>*.log` files last modified more than `max_age` ago.
/// A file that cannot be inspected or removed is logged and skipped.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!("Failed to read entry in {}: {}", log_dir.display(), e);
                continue;
            }
        };

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.starts_with(prefix) || !file_name.ends_with(".log") {
            continue;
        }

        match remove_if_expired(&path, now, max_age) {
            Ok(true) => {
                tracing::info!("Old log file deleted: {}", file_name);
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to delete old log file {}: {}", file_name, e),
        }
    }
    Ok(removed)
}

fn remove_if_expired(path: &Path, now: SystemTime, max_age: Duration) -> std::io::Result<bool> {
    let modified = fs::metadata(path)?.modified()?;
    if now.duration_since(modified).unwrap_or_default() <= max_age {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}
