mod camera_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod logging_config;
mod server_config;
mod storage_config;

pub(crate) use {
    camera_config::CameraConfig, capture_config::CaptureConfig, config::Config,
    logging_config::LoggingConfig, server_config::ServerConfig, storage_config::StorageConfig,
};

pub(crate) const DEFAULT_PORT: u16 = 8080;
pub(crate) const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub(crate) const DEFAULT_STATIC_DIR: &str = "public";
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "recordings";
pub(crate) const DEFAULT_LOG_FILE: &str = "server.log";
pub(crate) const DEFAULT_LOG_FILTER: &str = "rtsp_recorder=info,rtsp_recorder_core=info,tower_http=info";

/// Prefix of environment variables exposed through `/labels`.
pub(crate) const LABEL_PREFIX: &str = "LABEL_";

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

pub(crate) fn default_static_dir() -> std::path::PathBuf {
    DEFAULT_STATIC_DIR.into()
}
