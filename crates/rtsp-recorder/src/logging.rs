//! Tracing subscriber setup: console output plus a non-blocking log file.

use crate::{AppError, AppResult, config::LoggingConfig};

use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must live
/// until the process exits.
#[track_caller]
pub(crate) fn init(config: &LoggingConfig) -> AppResult<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| AppError::LoggingError {
            reason: format!("Invalid log filter {:?}: {}", config.filter, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let directory = config
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&config.file_name)
        .build(&directory)
        .map_err(|e| AppError::LoggingError {
            reason: format!("Failed to open log file in {:?}: {}", directory, e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::LoggingError {
            reason: format!("Failed to install subscriber: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(guard)
}
