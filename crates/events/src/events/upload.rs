use serde::{Deserialize, Serialize};

/// Upload distributor events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UploadEvent {
    /// Asking the discovery endpoint for candidate servers
    DiscoveryStarted { url: String },

    /// Discovery failed; no candidate will be tried
    DiscoveryFailed { url: String, error: String },

    /// Candidate pool assembled, in the order it will be tried
    PoolDiscovered { servers: Vec<String> },

    /// Trying one candidate
    CandidateStarted {
        server: String,
        attempt: usize,
        url: String,
    },

    /// A candidate failed; the next one will be tried
    CandidateFailed { server: String, error: String },

    /// A candidate accepted the archive
    Delivered { server: String, link: String },

    /// Every candidate failed
    Exhausted { attempted: usize },
}
