mod naming;
mod store;

pub use {
    naming::{ArtifactNamer, DEFAULT_EXTENSION, FILE_STEM_FORMAT},
    store::{ArtifactFile, ArtifactStore},
};
