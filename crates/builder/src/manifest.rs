//! Placeholder substitution in build manifests

use ferry_errors::BuildError;
use ferry_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use ferry_types::BuildRequest;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Ordered literal replacements for one manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPatch {
    pub path: PathBuf,
    pub replacements: Vec<(String, String)>,
}

impl ManifestPatch {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, replacements: Vec<(String, String)>) -> Self {
        Self {
            path: path.into(),
            replacements,
        }
    }

    /// Patch filling the standard `build_*` tokens from a request
    #[must_use]
    pub fn for_request(path: impl Into<PathBuf>, request: &BuildRequest) -> Self {
        Self::new(path, request.manifest_replacements())
    }

    /// Apply every replacement in order. Later pairs see the output of earlier
    /// ones. Empty tokens are skipped.
    #[must_use]
    pub fn apply_to(&self, content: &str) -> String {
        self.replacements
            .iter()
            .filter(|(token, _)| !token.is_empty())
            .fold(content.to_string(), |acc, (token, value)| {
                acc.replace(token.as_str(), value)
            })
    }
}

/// Outcome of a patch run
#[derive(Debug, Default)]
pub struct PatchReport {
    pub patched: Vec<PathBuf>,
    pub failed: Vec<BuildError>,
}

impl PatchReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Rewrite each manifest in place.
///
/// A file that cannot be read or written is reported and skipped; the
/// remaining files are still processed.
pub async fn apply_patches(patches: &[ManifestPatch], tx: &EventSender) -> PatchReport {
    let mut report = PatchReport::default();

    for patch in patches {
        match patch_file(patch).await {
            Ok(()) => {
                tx.emit(AppEvent::Build(BuildEvent::ManifestPatched {
                    path: patch.path.clone(),
                    replacements: patch.replacements.len(),
                }));
                report.patched.push(patch.path.clone());
            }
            Err(e) => {
                tx.emit(AppEvent::Build(BuildEvent::ManifestPatchFailed {
                    path: patch.path.clone(),
                    error: e.to_string(),
                }));
                report.failed.push(patch_error(&patch.path, &e));
            }
        }
    }

    report
}

async fn patch_file(patch: &ManifestPatch) -> std::io::Result<()> {
    let content = fs::read_to_string(&patch.path).await?;
    fs::write(&patch.path, patch.apply_to(&content)).await
}

fn patch_error(path: &Path, err: &std::io::Error) -> BuildError {
    BuildError::PatchFailed {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(t, v)| ((*t).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_replacements_apply_in_order() {
        let patch = ManifestPatch::new("m", pairs(&[("a", "b"), ("b", "c")]));
        // "a" becomes "b", which the second pair then turns into "c"
        assert_eq!(patch.apply_to("a b"), "c c");
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let patch = ManifestPatch::new("m", pairs(&[("", "x")]));
        assert_eq!(patch.apply_to("abc"), "abc");
    }

    #[test]
    fn test_for_request_fills_manifest() {
        let request = BuildRequest::new("1", "Host", "An app", "(c) Host", "1.2.3", "Me", "MIT");
        let patch = ManifestPatch::for_request("package.json", &request);
        let manifest = r#"{"name":"build_name","version":"build_version","license":"build_license"}"#;
        assert_eq!(
            patch.apply_to(manifest),
            r#"{"name":"Host","version":"1.2.3","license":"MIT"}"#
        );
    }

    proptest! {
        #[test]
        fn prop_known_tokens_are_all_replaced(
            values in proptest::collection::vec("[a-z0-9 .-]{0,12}", 6),
            order in Just((0..6).collect::<Vec<usize>>()).prop_shuffle(),
        ) {
            let tokens = ["TOKEN_A", "TOKEN_B", "TOKEN_C", "TOKEN_D", "TOKEN_E", "TOKEN_F"];
            let content = order.iter().map(|&i| tokens[i]).collect::<Vec<_>>().join("|");
            let replacements: Vec<(String, String)> = tokens
                .iter()
                .zip(&values)
                .map(|(t, v)| ((*t).to_string(), v.clone()))
                .collect();
            let patch = ManifestPatch::new("m", replacements);

            let patched = patch.apply_to(&content);
            for token in tokens {
                prop_assert!(!patched.contains(token));
            }
            let expected = order.iter().map(|&i| values[i].as_str()).collect::<Vec<_>>().join("|");
            prop_assert_eq!(&patched, &expected);

            // Patching already-patched content changes nothing
            prop_assert_eq!(patch.apply_to(&patched), patched);
        }
    }
}
