//! Log sink setup for the CLI.
//!
//! The export core only emits `tracing` events; this module owns where they
//! go. Two append-only files are produced per the operational contract: a
//! combined log capturing every fetch, retry, and rate-limit event, and an
//! error-only log for quick triage.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use camino::Utf8Path;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::github::error::ExportError;

/// Combined log filename.
const COMBINED_LOG: &str = "combined.log";
/// Error-only log filename.
const ERROR_LOG: &str = "error.log";

fn io_error(context: &str, error: &std::io::Error) -> ExportError {
    ExportError::Io {
        message: format!("{context}: {error}"),
    }
}

fn open_append(path: &Utf8Path) -> Result<std::fs::File, ExportError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| io_error(&format!("open log file '{path}'"), &error))
}

/// Initialises the global subscriber with the two file sinks.
///
/// `RUST_LOG` takes precedence over the configured level so operators can
/// raise verbosity without touching configuration files.
///
/// # Errors
///
/// Returns `ExportError::Io` when the log directory or files cannot be
/// created, or `ExportError::Configuration` when the filter expression or
/// subscriber installation fails.
pub fn init(log_root: &Utf8Path, level: Option<&str>) -> Result<(), ExportError> {
    fs::create_dir_all(log_root)
        .map_err(|error| io_error(&format!("create log directory '{log_root}'"), &error))?;

    let combined = open_append(&log_root.join(COMBINED_LOG))?;
    let errors = open_append(&log_root.join(ERROR_LOG))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("info")))
        .map_err(|error| ExportError::Configuration {
            message: format!("invalid log filter: {error}"),
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(combined)),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(errors))
                .with_filter(LevelFilter::ERROR),
        )
        .try_init()
        .map_err(|error| ExportError::Configuration {
            message: format!("failed to install log subscriber: {error}"),
        })
}
