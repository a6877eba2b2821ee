//! Core types and utilities for the marketplace views

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

use std::path::Path;
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

// Re-export commonly used types
pub use config::{Config, LoggingConfig};
pub use error::{Error, Result};
pub use tracing_appender::non_blocking::WorkerGuard;
pub use types::{
    AdminPeriodBucket, AdminProduct, BucketProduct, COUNTRY_OPTIONS, CountryOption,
    DeletedProductRecord, SystemStats, VendorRecord, VendorStatus,
};

/// Initialize the logging system
///
/// `RUST_LOG` wins over the configured level when it is set. When
/// `logging.file` is set, events are also written there as JSON lines
/// through a background writer; keep the returned guard alive until exit or
/// buffered lines are lost.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// has already been installed.
pub fn init_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let stdout = if logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file, guard) = match &logging.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .try_init()
        .map_err(|e| Error::Configuration {
            message: format!("failed to initialize logging: {e}"),
        })?;

    Ok(guard)
}

/// Non-blocking appender for `path`, creating its directory if needed
fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Configuration {
            message: format!("log file '{}' has no file name", path.display()),
        })?;
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| Error::Configuration {
            message: format!("failed to open log file '{}': {e}", path.display()),
        })?;

    Ok(tracing_appender::non_blocking(appender))
}
