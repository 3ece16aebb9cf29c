//! The immutable description of one build

use serde::{Deserialize, Serialize};

/// Everything the pipeline needs to know about the build it is running.
///
/// Built once from settings at startup and only ever handed out by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    recipient: String,
    name: String,
    description: String,
    copyright: String,
    version: String,
    author: String,
    license: String,
}

impl BuildRequest {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        recipient: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        copyright: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
        license: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            name: name.into(),
            description: description.into(),
            copyright: copyright.into(),
            version: version.into(),
            author: author.into(),
            license: license.into(),
        }
    }

    /// Messaging identifier of whoever asked for the build
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Product name; also the base name of the produced artifact
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn copyright(&self) -> &str {
        &self.copyright
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn license(&self) -> &str {
        &self.license
    }

    /// Manifest placeholder tokens paired with their values, in application order
    #[must_use]
    pub fn manifest_replacements(&self) -> Vec<(String, String)> {
        [
            ("build_name", &self.name),
            ("build_description", &self.description),
            ("build_copyright", &self.copyright),
            ("build_version", &self.version),
            ("build_author", &self.author),
            ("build_license", &self.license),
        ]
        .into_iter()
        .map(|(token, value)| (token.to_string(), value.clone()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_replacements_order() {
        let request = BuildRequest::new("42", "Host", "desc", "(c)", "1.0.0", "me", "MIT");
        let tokens: Vec<String> = request
            .manifest_replacements()
            .into_iter()
            .map(|(token, _)| token)
            .collect();
        assert_eq!(
            tokens,
            [
                "build_name",
                "build_description",
                "build_copyright",
                "build_version",
                "build_author",
                "build_license"
            ]
        );
    }
}
