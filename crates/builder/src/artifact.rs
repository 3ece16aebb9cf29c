//! Locating the toolchain's output

use ferry_errors::{BuildError, Error};
use ferry_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use ferry_types::Platform;
use std::path::{Path, PathBuf};

/// `<build_dir>/dist/<build_name>.<ext>`
#[must_use]
pub fn expected_artifact_path(build_dir: &Path, build_name: &str, platform: Platform) -> PathBuf {
    build_dir
        .join("dist")
        .join(format!("{build_name}.{}", platform.artifact_extension()))
}

/// Confirm the artifact exists and return its path.
///
/// # Errors
///
/// Returns `BuildError::ArtifactMissing` if no regular file is at the
/// expected path.
pub async fn verify_artifact(
    build_dir: &Path,
    build_name: &str,
    platform: Platform,
    tx: &EventSender,
) -> Result<PathBuf, Error> {
    let path = expected_artifact_path(build_dir, build_name, platform);

    let is_file = tokio::fs::metadata(&path)
        .await
        .is_ok_and(|meta| meta.is_file());

    if is_file {
        tx.emit(AppEvent::Build(BuildEvent::ArtifactVerified { path: path.clone() }));
        Ok(path)
    } else {
        tx.emit(AppEvent::Build(BuildEvent::ArtifactMissing { path: path.clone() }));
        Err(BuildError::ArtifactMissing {
            path: path.display().to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_path_per_platform() {
        let dir = Path::new("/work");
        assert_eq!(
            expected_artifact_path(dir, "Host", Platform::Windows),
            PathBuf::from("/work/dist/Host.exe")
        );
        assert_eq!(
            expected_artifact_path(dir, "Host", Platform::MacOs),
            PathBuf::from("/work/dist/Host.dmg")
        );
    }

    #[tokio::test]
    async fn test_directory_is_not_an_artifact() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = expected_artifact_path(temp.path(), "Host", Platform::Windows);
        std::fs::create_dir_all(&path).unwrap();

        let (tx, _rx) = ferry_events::channel();
        let err = verify_artifact(temp.path(), "Host", Platform::Windows, &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::ArtifactMissing { .. })
        ));
    }
}
