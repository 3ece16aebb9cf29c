use serde::{Deserialize, Serialize};

// Declare all domain modules
pub mod build;
pub mod cleanup;
pub mod general;
pub mod notify;
pub mod pipeline;
pub mod upload;

// Re-export all domain events
pub use build::*;
pub use cleanup::*;
pub use general::*;
pub use notify::*;
pub use pipeline::*;
pub use upload::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, debug output)
    General(GeneralEvent),

    /// Orchestrator stage transitions and outcome
    Pipeline(PipelineEvent),

    /// Manifest, toolchain, artifact and archive events
    Build(BuildEvent),

    /// Discovery and per-candidate upload events
    Upload(UploadEvent),

    /// Messaging events
    Notify(NotifyEvent),

    /// Workspace removal events
    Cleanup(CleanupEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            // Error-level events
            Self::General(GeneralEvent::Error { .. })
            | Self::Pipeline(PipelineEvent::Failed { .. })
            | Self::Build(BuildEvent::ArtifactMissing { .. } | BuildEvent::ArchiveFailed { .. })
            | Self::Upload(UploadEvent::DiscoveryFailed { .. } | UploadEvent::Exhausted { .. })
            | Self::Cleanup(CleanupEvent::Failed { .. }) => Level::ERROR,

            // Warning-level events
            Self::General(GeneralEvent::Warning { .. })
            | Self::Build(BuildEvent::ManifestPatchFailed { .. })
            | Self::Upload(UploadEvent::CandidateFailed { .. })
            | Self::Notify(NotifyEvent::Failed { .. })
            | Self::Cleanup(CleanupEvent::Retrying { .. }) => Level::WARN,

            // Debug-level events (internal detail)
            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Pipeline(PipelineEvent::StageEntered { .. })
            | Self::Upload(UploadEvent::CandidateStarted { .. }) => Level::DEBUG,

            // Default to INFO for most events
            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "ferry::events::general",
            Self::Pipeline(_) => "ferry::events::pipeline",
            Self::Build(_) => "ferry::events::build",
            Self::Upload(_) => "ferry::events::upload",
            Self::Notify(_) => "ferry::events::notify",
            Self::Cleanup(_) => "ferry::events::cleanup",
        }
    }

    /// Get structured fields for logging
    #[must_use]
    pub fn log_fields(&self) -> String {
        format!("{self:?}")
    }
}
