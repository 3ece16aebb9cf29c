#![deny(clippy::pedantic, unsafe_code)]
//! Build half of the ferry pipeline
//!
//! This crate prepares and produces the deliverable: it patches the build
//! manifest, runs the external toolchain, checks that the artifact exists,
//! compresses it, and finally removes the workspace.

mod archive;
mod artifact;
mod cleanup;
mod invoker;
mod manifest;

pub use archive::create_archive;
pub use artifact::{expected_artifact_path, verify_artifact};
pub use cleanup::WorkspaceCleaner;
pub use invoker::{BuildInvoker, ToolchainInvoker};
pub use manifest::{apply_patches, ManifestPatch, PatchReport};
