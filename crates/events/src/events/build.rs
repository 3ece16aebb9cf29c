use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Events from the build half of the pipeline: manifest, toolchain, artifact, archive
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildEvent {
    /// All replacements were written back to a manifest
    ManifestPatched {
        path: PathBuf,
        replacements: usize,
    },

    /// A manifest could not be read or written; processing continued
    ManifestPatchFailed { path: PathBuf, error: String },

    /// The toolchain process is about to start
    ToolchainStarted {
        command: String,
        working_dir: PathBuf,
    },

    /// The toolchain process exited. The code is informational only.
    ToolchainExited { exit_code: Option<i32> },

    /// The expected artifact is on disk
    ArtifactVerified { path: PathBuf },

    /// The expected artifact is absent
    ArtifactMissing { path: PathBuf },

    /// The archive was written
    ArchiveCreated { path: PathBuf, size: u64 },

    /// Writing the archive failed
    ArchiveFailed { path: PathBuf, error: String },
}
