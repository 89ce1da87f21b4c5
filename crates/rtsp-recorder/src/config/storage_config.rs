use crate::config::DEFAULT_OUTPUT_DIR;

use std::path::PathBuf;

use serde::Deserialize;

/// Recording storage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory recordings are written to and served from (`OUTPUT_DIR`).
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}
