//! Configuration management for rtsp-recorder.
//!
//! Settings come from an optional TOML file overlaid with environment
//! variables, so a plain `.env`-style deployment works without any file.

use crate::{
    AppError, AppResult,
    config::{
        CameraConfig, CaptureConfig, LABEL_PREFIX, LoggingConfig, ServerConfig, StorageConfig,
    },
};

use rtsp_recorder_core::{ArtifactNamer, FfmpegLauncher, SessionConfig};

use std::{
    collections::BTreeMap,
    fs,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Environment variable naming an explicit config file.
pub(crate) const CONFIG_PATH_ENV: &str = "RECORDER_CONFIG";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera stream settings.
    pub camera: CameraConfig,
    /// Capture process settings.
    pub capture: CaptureConfig,
    /// Recording storage settings.
    pub storage: StorageConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
    /// Display labels served by `/labels`, keyed `LABEL_*`.
    pub labels: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from the config file (if any) and the process environment.
    ///
    /// The file is `$RECORDER_CONFIG` when set, otherwise `config.toml` in
    /// the platform config directory. A missing default file is not an error;
    /// a missing explicit file is.
    #[track_caller]
    pub fn load() -> AppResult<Self> {
        let mut config = match Self::config_path()? {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };

        config.apply_env(std::env::vars())?;

        Ok(config)
    }

    /// Parse a TOML config file.
    #[track_caller]
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parse TOML config text. Missing sections and fields take defaults.
    #[track_caller]
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Overlay environment variables onto the loaded configuration.
    ///
    /// Takes the variables explicitly so callers (and tests) decide where
    /// they come from.
    #[track_caller]
    pub fn apply_env<I>(&mut self, vars: I) -> AppResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "RTSP_USER" => self.camera.user = value,
                "RTSP_PASSWORD" => self.camera.password = value,
                "RTSP_IP" => self.camera.host = value,
                "RTSP_PORT" => self.camera.port = parse_port(&key, &value)?,
                "RTSP_SDP" => self.camera.path = value,
                "RTSP_TRANSPORT" => self.camera.transport = Some(value),
                "OUTPUT_DIR" => self.storage.output_dir = PathBuf::from(value),
                "PORT" => self.server.port = parse_port(&key, &value)?,
                "STATIC_DIR" => self.server.static_dir = PathBuf::from(value),
                "LOG_DIR" => self.logging.directory = Some(PathBuf::from(value)),
                "FFMPEG_PATH" => self.capture.ffmpeg_path = PathBuf::from(value),
                _ if key.starts_with(LABEL_PREFIX) => {
                    self.labels.insert(key, value);
                }
                _ => continue,
            }
        }

        Ok(())
    }

    /// Check settings needed to record and ensure the output directory exists.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        if self.camera.host.is_empty() {
            return Err(AppError::ConfigError {
                reason: "Camera host not configured. Set RTSP_IP or camera.host.".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.capture.startup_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                reason: "capture.startup_timeout_secs must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let output_dir = &self.storage.output_dir;
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create output directory {:?}: {}", output_dir, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            debug!(output_dir = ?output_dir, "Created output directory");
        } else if !output_dir.is_dir() {
            return Err(AppError::ConfigError {
                reason: format!("Output path {:?} is not a directory", output_dir),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Settings for the recording session manager.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            source: self.camera.source(),
            namer: ArtifactNamer::new(&self.storage.output_dir, &self.capture.extension),
            startup_timeout: Duration::from_secs(self.capture.startup_timeout_secs),
            finalize_timeout: Duration::from_secs(self.capture.finalize_timeout_secs),
        }
    }

    /// The capture process launcher for these settings.
    pub fn launcher(&self) -> FfmpegLauncher {
        FfmpegLauncher::new(&self.capture.ffmpeg_path)
            .with_rtsp_transport(self.camera.transport.clone())
    }

    /// Get the local server URL for log messages.
    pub fn server_url(&self) -> String {
        format!("http://localhost:{}", self.server.port)
    }

    #[track_caller]
    fn config_path() -> AppResult<Option<PathBuf>> {
        if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(AppError::ConfigError {
                    reason: format!("{} points to missing file {:?}", CONFIG_PATH_ENV, path),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            return Ok(Some(path));
        }

        let default = ProjectDirs::from("com", "rtsp-recorder", "RTSP-Recorder")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .filter(|path| path.exists());

        Ok(default)
    }
}

#[track_caller]
fn parse_port(key: &str, value: &str) -> AppResult<u16> {
    value.trim().parse().map_err(|e| AppError::ConfigError {
        reason: format!("{} must be a port number, got {:?}: {}", key, value, e),
        location: ErrorLocation::from(Location::caller()),
    })
}
