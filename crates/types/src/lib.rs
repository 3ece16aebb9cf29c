#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for ferry
//!
//! This crate provides the value types shared by the pipeline crates: the
//! build request, platform profiles, pipeline stages and the archive handle.

pub mod artifact;
pub mod request;

pub use artifact::ArchiveArtifact;
pub use request::BuildRequest;

use ferry_errors::BuildError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform profile handed to the build toolchain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Windows,
    Linux,
    #[serde(rename = "macos")]
    MacOs,
}

impl Platform {
    /// Command-line flag selecting this platform
    #[must_use]
    pub fn toolchain_flag(self) -> &'static str {
        match self {
            Self::Windows => "--win",
            Self::Linux => "--linux",
            Self::MacOs => "--mac",
        }
    }

    /// Extension of the artifact the toolchain produces for this platform
    #[must_use]
    pub fn artifact_extension(self) -> &'static str {
        match self {
            Self::Windows => "exe",
            Self::Linux => "AppImage",
            Self::MacOs => "dmg",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
        }
    }
}

impl FromStr for Platform {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "macos" | "mac" => Ok(Self::MacOs),
            _ => Err(BuildError::UnknownPlatform {
                value: s.to_string(),
            }),
        }
    }
}

/// Pipeline states, in the order a successful run visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Patching,
    Building,
    Verifying,
    Archiving,
    Uploading,
    Notifying,
    Cleaning,
    Done,
    Failed,
}

impl Stage {
    /// Whether a failure in this stage changes the delivery outcome.
    ///
    /// Notifying and cleaning are best-effort and never fail the run.
    #[must_use]
    pub fn can_fail(self) -> bool {
        matches!(
            self,
            Self::Patching | Self::Building | Self::Verifying | Self::Archiving | Self::Uploading
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Patching => "patching",
            Self::Building => "building",
            Self::Verifying => "verifying",
            Self::Archiving => "archiving",
            Self::Uploading => "uploading",
            Self::Notifying => "notifying",
            Self::Cleaning => "cleaning",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_aliases() {
        assert_eq!("win".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("mac".parse::<Platform>().unwrap(), Platform::MacOs);
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_profile() {
        assert_eq!(Platform::Windows.toolchain_flag(), "--win");
        assert_eq!(Platform::Windows.artifact_extension(), "exe");
        assert_eq!(Platform::MacOs.to_string(), "macos");
    }

    #[test]
    fn test_only_delivery_stages_can_fail() {
        assert!(Stage::Uploading.can_fail());
        assert!(!Stage::Notifying.can_fail());
        assert!(!Stage::Cleaning.can_fail());
    }
}
