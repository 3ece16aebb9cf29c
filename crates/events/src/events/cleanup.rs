use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Workspace cleaner events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CleanupEvent {
    /// Removal hit "directory not empty"; retrying after a delay
    Retrying {
        path: PathBuf,
        attempt: u32,
        delay_ms: u64,
    },

    /// The workspace is gone
    Removed { path: PathBuf },

    /// Removal failed for good
    Failed { path: PathBuf, error: String },
}
