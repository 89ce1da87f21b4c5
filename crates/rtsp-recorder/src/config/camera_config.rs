use rtsp_recorder_core::{DEFAULT_RTSP_PORT, RtspSource};

use std::fmt;

use serde::Deserialize;

/// RTSP camera connection settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Stream user name (`RTSP_USER`).
    pub user: String,
    /// Stream password (`RTSP_PASSWORD`).
    pub password: String,
    /// Camera host or IP (`RTSP_IP`).
    pub host: String,
    /// Camera RTSP port (`RTSP_PORT`).
    pub port: u16,
    /// Stream path (`RTSP_SDP`).
    pub path: String,
    /// Force `tcp` or `udp` RTSP transport (`RTSP_TRANSPORT`).
    pub transport: Option<String>,
}

impl CameraConfig {
    /// Source address handed to the session manager.
    pub fn source(&self) -> RtspSource {
        RtspSource {
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            host: String::new(),
            port: DEFAULT_RTSP_PORT,
            path: String::new(),
            transport: None,
        }
    }
}

// Password stays out of logs.
impl fmt::Debug for CameraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraConfig")
            .field("source", &self.source().redacted())
            .field("transport", &self.transport)
            .finish()
    }
}
