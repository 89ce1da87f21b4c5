use crate::config::{default_bind_address, default_port, default_static_dir};

use std::path::PathBuf;

use serde::Deserialize;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen port (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listen address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Directory of static UI assets (`STATIC_DIR`).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            static_dir: default_static_dir(),
        }
    }
}
