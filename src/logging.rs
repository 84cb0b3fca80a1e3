//! Tracing setup.
//!
//! Console output goes to stderr. A second, ANSI-free layer writes to a file chosen by
//! `SHEETSEARCH_LOG_FILE`:
//!
//! - unset: daily-rotated files `logs/sheetsearch.log.YYYY-MM-DD`
//! - `off`: no file layer
//! - any other value: append to that exact path
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "SHEETSEARCH_LOG_FILE";
const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "sheetsearch.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where the file layer writes.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Disabled,
    Append(PathBuf),
    Daily { directory: PathBuf, prefix: String },
}

fn resolve_target(value: Option<String>) -> LogTarget {
    match value.as_deref().map(str::trim) {
        None | Some("") => LogTarget::Daily {
            directory: PathBuf::from(LOG_DIR),
            prefix: LOG_FILE_PREFIX.to_string(),
        },
        Some(value) if value.eq_ignore_ascii_case("off") => LogTarget::Disabled,
        Some(path) => LogTarget::Append(PathBuf::from(path)),
    }
}

/// Install the global subscriber. `RUST_LOG` filters both layers (default `info`).
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = open_writer(resolve_target(std::env::var(LOG_FILE_ENV).ok())).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

fn open_writer(target: LogTarget) -> Option<NonBlocking> {
    let (writer, guard) = match target {
        LogTarget::Disabled => return None,
        LogTarget::Append(path) => {
            let file = match open_append(&path) {
                Ok(file) => file,
                Err(err) => {
                    eprintln!("Failed to open log file {}: {err}", path.display());
                    return None;
                }
            };
            tracing_appender::non_blocking(file)
        }
        LogTarget::Daily { directory, prefix } => {
            if let Err(err) = std::fs::create_dir_all(&directory) {
                eprintln!("Failed to create {}: {err}", directory.display());
                return None;
            }
            tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, prefix))
        }
    };
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}

fn open_append(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}
