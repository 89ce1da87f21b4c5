use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone};

/// Container extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// `chrono` format of an artifact file stem: `YYYY-MM-DD_HHmmss`.
pub const FILE_STEM_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Derives artifact paths from capture start instants.
///
/// Names sort chronologically and have second resolution, so two captures
/// started within the same wall-clock second map to the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNamer {
    output_dir: PathBuf,
    extension: String,
}

impl ArtifactNamer {
    /// Create a namer for `output_dir`. A leading `.` on `extension` is ignored.
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl AsRef<str>) -> Self {
        let extension = extension.as_ref().trim_start_matches('.');
        Self {
            output_dir: output_dir.into(),
            extension: if extension.is_empty() {
                DEFAULT_EXTENSION.to_string()
            } else {
                extension.to_string()
            },
        }
    }

    /// Directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Artifact file extension, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name for a capture started at `instant`, in that instant's time zone.
    pub fn file_name_for<Tz>(&self, instant: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!("{}.{}", instant.format(FILE_STEM_FORMAT), self.extension)
    }

    /// Full output path for a capture started at `instant`.
    pub fn path_for<Tz>(&self, instant: &DateTime<Tz>) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.output_dir.join(self.file_name_for(instant))
    }
}
