use crate::{CoreResult, RecorderError, artifact::ArtifactNamer};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    time::SystemTime,
};

use error_location::ErrorLocation;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Finished recordings in the output directory.
///
/// Artifacts are identified by file name only. Names are validated so that
/// requests can never reach outside the output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: PathBuf,
    extension: String,
}

/// An artifact opened for reading.
#[derive(Debug)]
pub struct ArtifactFile {
    /// Validated file name.
    pub name: String,
    /// Open handle positioned at the start of the file.
    pub file: fs::File,
    /// File size in bytes.
    pub len: u64,
}

impl ArtifactStore {
    /// Create a store over the directory and extension used by `namer`.
    pub fn new(namer: &ArtifactNamer) -> Self {
        Self {
            output_dir: namer.output_dir().to_path_buf(),
            extension: namer.extension().to_string(),
        }
    }

    /// Directory the store reads from.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// List artifact file names, most recently created first.
    ///
    /// Creation time falls back to modification time on filesystems that do
    /// not record it. Ties are broken by name, newest name first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the directory cannot be read.
    #[instrument(skip(self), fields(output_dir = ?self.output_dir))]
    pub async fn list(&self) -> CoreResult<Vec<String>> {
        let mut dir = match fs::read_dir(&self.output_dir).await {
            Ok(dir) => dir,
            Err(source) => {
                return Err(RecorderError::Storage {
                    reason: "Unable to list recordings".to_string(),
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let mut recordings: Vec<(SystemTime, String)> = Vec::new();

        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(RecorderError::Storage {
                        reason: "Unable to list recordings".to_string(),
                        source,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            };

            let path = entry.path();
            if !self.has_extension(&path) {
                continue;
            }

            // Entries can disappear between read_dir and stat.
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = ?path, error = %e, "Skipping unreadable recording");
                    continue;
                }
            };

            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            recordings.push((created, entry.file_name().to_string_lossy().into_owned()));
        }

        recordings.sort_by(|a, b| b.cmp(a));

        debug!(count = recordings.len(), "Recordings listed");

        Ok(recordings.into_iter().map(|(_, name)| name).collect())
    }

    /// Open an artifact for streaming.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArtifactName` for names that are not plain file names,
    /// or `Storage` if the file is missing or unreadable.
    #[instrument(skip(self))]
    pub async fn open(&self, name: &str) -> CoreResult<ArtifactFile> {
        let path = self.resolve(name)?;

        let storage_error = |source: std::io::Error| RecorderError::Storage {
            reason: format!("Failed to open recording {}", name),
            source,
            location: ErrorLocation::from(Location::caller()),
        };

        let file = fs::File::open(&path).await.map_err(storage_error)?;
        let metadata = file.metadata().await.map_err(storage_error)?;

        if !metadata.is_file() {
            return Err(storage_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        Ok(ArtifactFile {
            name: name.to_string(),
            file,
            len: metadata.len(),
        })
    }

    /// Delete an artifact.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArtifactName` for names that are not plain file names,
    /// or `Storage` if removal fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> CoreResult<()> {
        let path = self.resolve(name)?;

        fs::remove_file(&path)
            .await
            .map_err(|source| RecorderError::Storage {
                reason: format!("Failed to delete recording {}", name),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(name, "Recording deleted");

        Ok(())
    }

    /// Map an artifact name to its path inside the output directory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArtifactName` for empty names, hidden names, `..`, or
    /// names containing a path separator.
    #[track_caller]
    pub fn resolve(&self, name: &str) -> CoreResult<PathBuf> {
        let is_plain = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\', '\0'])
            && Path::new(name).file_name().is_some_and(|n| n == name);

        if !is_plain {
            return Err(RecorderError::InvalidArtifactName {
                name: name.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(self.output_dir.join(name))
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
    }
}
