use crate::config::{DEFAULT_LOG_FILE, DEFAULT_LOG_FILTER};

use std::path::PathBuf;

use serde::Deserialize;

/// Log output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the log file (`LOG_DIR`). Defaults to the working directory.
    pub directory: Option<PathBuf>,
    /// Log file name.
    pub file_name: String,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    /// Write the log file as JSON lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: DEFAULT_LOG_FILE.to_string(),
            filter: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}
