//! Build settings loaded from `settings.json`
//!
//! Loading never fails. A missing file, a malformed file and a missing key all
//! resolve to the same hard-coded default, but each field remembers where its
//! value came from so callers (and tests) can tell the cases apart.

use ferry_events::{EventEmitter, EventSender};
use ferry_types::BuildRequest;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;

/// Conventional file name, resolved against the working directory
pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_CUSTOMER_ID: &str = "0";
pub const DEFAULT_BUILD_NAME: &str = "Host";
pub const DEFAULT_BUILD_DESCRIPTION: &str = "Application by Host";
pub const DEFAULT_BUILD_COPYRIGHT: &str = "Host Enterprise";
pub const DEFAULT_BUILD_VERSION: &str = "1.0.0";
pub const DEFAULT_BUILD_AUTHOR: &str = "Host Enterprise";
pub const DEFAULT_BUILD_LICENSE: &str = "MIT";

/// Where a single setting's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingSource {
    Default,
    File,
}

/// What happened when the settings document was read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsOrigin {
    /// No document was available
    Missing,
    /// A document was available but was not a JSON object
    Corrupt,
    /// A JSON object was read; individual keys may still be absent
    Parsed,
}

/// A value tagged with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: SettingSource,
}

impl<T> Sourced<T> {
    fn file(value: T) -> Self {
        Self {
            value,
            source: SettingSource::File,
        }
    }

    fn default(value: T) -> Self {
        Self {
            value,
            source: SettingSource::Default,
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.source == SettingSource::Default
    }
}

/// Fully populated, immutable build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSettings {
    pub origin: SettingsOrigin,
    pub customer_id: Sourced<String>,
    pub build_name: Sourced<String>,
    pub build_description: Sourced<String>,
    pub build_copyright: Sourced<String>,
    pub build_version: Sourced<String>,
    pub build_author: Sourced<String>,
    pub build_license: Sourced<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::from_source(None)
    }
}

impl BuildSettings {
    /// Build settings from the optional contents of a settings document.
    ///
    /// Strings are taken verbatim; numbers and booleans are stringified.
    /// `null`, arrays and objects count as absent.
    #[must_use]
    pub fn from_source(contents: Option<&str>) -> Self {
        let (origin, map) = match contents {
            None => (SettingsOrigin::Missing, Map::new()),
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => (SettingsOrigin::Parsed, map),
                Ok(_) | Err(_) => (SettingsOrigin::Corrupt, Map::new()),
            },
        };

        let field = |key: &str, default: &str| match map.get(key).and_then(scalar_to_string) {
            Some(value) => Sourced::file(value),
            None => Sourced::default(default.to_string()),
        };

        Self {
            origin,
            customer_id: field("customer_id", DEFAULT_CUSTOMER_ID),
            build_name: field("build_name", DEFAULT_BUILD_NAME),
            build_description: field("build_description", DEFAULT_BUILD_DESCRIPTION),
            build_copyright: field("build_copyright", DEFAULT_BUILD_COPYRIGHT),
            build_version: field("build_version", DEFAULT_BUILD_VERSION),
            build_author: field("build_author", DEFAULT_BUILD_AUTHOR),
            build_license: field("build_license", DEFAULT_BUILD_LICENSE),
        }
    }

    /// Read settings from disk; any read failure yields defaults.
    ///
    /// Unreadable or malformed documents are reported as warnings on `tx`.
    pub async fn load(path: &Path, tx: &EventSender) -> Self {
        let settings = match fs::read_to_string(path).await {
            Ok(contents) => Self::from_source(Some(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Self::from_source(Some("")),
            Err(e) => {
                tx.emit_debug(format!("settings file {} unavailable: {e}", path.display()));
                Self::from_source(None)
            }
        };

        if settings.origin == SettingsOrigin::Corrupt {
            tx.emit_warning_with_context(
                "settings file is not a JSON object, using defaults",
                path.display().to_string(),
            );
        }
        settings
    }

    /// Every field with its key, for provenance reporting
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &Sourced<String>); 7] {
        [
            ("customer_id", &self.customer_id),
            ("build_name", &self.build_name),
            ("build_description", &self.build_description),
            ("build_copyright", &self.build_copyright),
            ("build_version", &self.build_version),
            ("build_author", &self.build_author),
            ("build_license", &self.build_license),
        ]
    }

    /// Freeze the settings into the request the pipeline consumes
    #[must_use]
    pub fn into_request(self) -> BuildRequest {
        BuildRequest::new(
            self.customer_id.value,
            self.build_name.value,
            self.build_description.value,
            self.build_copyright.value,
            self.build_version.value,
            self.build_author.value,
            self.build_license.value,
        )
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = BuildSettings::from_source(None);
        assert_eq!(settings.origin, SettingsOrigin::Missing);
        assert!(settings.fields().iter().all(|(_, f)| f.is_default()));
        assert_eq!(settings.build_name.value, "Host");
        assert_eq!(settings.build_version.value, "1.0.0");
    }

    #[test]
    fn test_corrupt_and_missing_agree_on_values() {
        let corrupt = BuildSettings::from_source(Some("{ not json"));
        let missing = BuildSettings::from_source(None);
        assert_eq!(corrupt.origin, SettingsOrigin::Corrupt);
        assert_eq!(corrupt.into_request(), missing.into_request());
    }

    #[test]
    fn test_non_object_document_is_corrupt() {
        let settings = BuildSettings::from_source(Some("[1, 2, 3]"));
        assert_eq!(settings.origin, SettingsOrigin::Corrupt);
    }

    #[test]
    fn test_partial_document_tracks_provenance() {
        let settings = BuildSettings::from_source(Some(r#"{"build_name": "Relay"}"#));
        assert_eq!(settings.origin, SettingsOrigin::Parsed);
        assert_eq!(settings.build_name.value, "Relay");
        assert_eq!(settings.build_name.source, SettingSource::File);
        assert!(settings.build_license.is_default());
        assert_eq!(settings.build_license.value, "MIT");
    }

    #[test]
    fn test_numeric_customer_id_is_stringified() {
        let settings = BuildSettings::from_source(Some(r#"{"customer_id": 6464}"#));
        assert_eq!(settings.customer_id.value, "6464");
        assert_eq!(settings.customer_id.source, SettingSource::File);
    }

    #[test]
    fn test_null_and_nested_values_fall_back() {
        let settings =
            BuildSettings::from_source(Some(r#"{"build_author": null, "build_version": [1]}"#));
        assert!(settings.build_author.is_default());
        assert!(settings.build_version.is_default());
    }
}
