//! Handle to the compressed build output

use std::path::{Path, PathBuf};

/// The archive produced from a verified artifact.
///
/// Uploading consumes the handle, so nothing can refer to the archive once
/// the workspace that contains it is removed.
#[derive(Debug, PartialEq, Eq)]
pub struct ArchiveArtifact {
    path: PathBuf,
}

impl ArchiveArtifact {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used for the upload part
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| "archive.zip".to_string(), |n| n.to_string_lossy().into_owned())
    }
}
