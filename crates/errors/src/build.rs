//! Build pipeline error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("failed to update manifest {path}: {message}")]
    PatchFailed { path: String, message: String },

    #[error("failed to launch {command}: {message}")]
    ToolchainSpawn { command: String, message: String },

    #[error("build artifact not found: {path}")]
    ArtifactMissing { path: String },

    #[error("archive not found: {path}")]
    ArchiveMissing { path: String },

    #[error("failed to archive {path}: {message}")]
    ArchiveFailed { path: String, message: String },

    #[error("unknown platform: {value}")]
    UnknownPlatform { value: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolchainSpawn { .. } => {
                Some("Make sure the build toolchain is installed and on PATH.")
            }
            Self::ArtifactMissing { .. } => {
                Some("Check the toolchain output above; the build did not produce its artifact.")
            }
            Self::ArchiveMissing { .. } | Self::ArchiveFailed { .. } => {
                Some("Ensure the workspace is writable and has free space.")
            }
            Self::UnknownPlatform { .. } => Some("Use one of: windows, linux, macos."),
            Self::PatchFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::PatchFailed { .. } => "build.patch_failed",
            Self::ToolchainSpawn { .. } => "build.toolchain_spawn",
            Self::ArtifactMissing { .. } => "build.artifact_missing",
            Self::ArchiveMissing { .. } => "build.archive_missing",
            Self::ArchiveFailed { .. } => "build.archive_failed",
            Self::UnknownPlatform { .. } => "build.unknown_platform",
        };
        Some(code)
    }
}
