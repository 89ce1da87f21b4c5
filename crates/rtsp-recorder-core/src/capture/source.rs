use std::fmt;

/// Default RTSP port.
pub const DEFAULT_RTSP_PORT: u16 = 554;

/// Address components of the RTSP stream to capture.
#[derive(Clone, PartialEq, Eq)]
pub struct RtspSource {
    /// Stream user name. Empty means no credentials.
    pub user: String,
    /// Stream password.
    pub password: String,
    /// Camera host name or IP address.
    pub host: String,
    /// Camera RTSP port.
    pub port: u16,
    /// Stream path on the camera (e.g. `stream1` or `live.sdp`).
    pub path: String,
}

impl RtspSource {
    /// Full stream URL including credentials, as passed to the capture command.
    pub fn url(&self) -> String {
        self.render(&self.password)
    }

    /// Stream URL with the password masked, for logging.
    pub fn redacted(&self) -> String {
        self.render("***")
    }

    fn render(&self, password: &str) -> String {
        let path = self.path.trim_start_matches('/');
        if self.user.is_empty() {
            format!("rtsp://{}:{}/{}", self.host, self.port, path)
        } else {
            format!(
                "rtsp://{}:{}@{}:{}/{}",
                self.user, password, self.host, self.port, path
            )
        }
    }
}

impl fmt::Debug for RtspSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RtspSource").field(&self.redacted()).finish()
    }
}
