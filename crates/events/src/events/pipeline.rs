use ferry_types::Stage;
use serde::{Deserialize, Serialize};

/// Orchestrator-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    /// A run started for the named build
    Started { build_name: String },

    /// The pipeline moved into a new stage
    StageEntered { stage: Stage },

    /// A delivery-path stage failed; `trace` carries the full cause chain
    Failed {
        stage: Stage,
        code: Option<String>,
        message: String,
        hint: Option<String>,
        retryable: bool,
        trace: String,
    },

    /// The run reached its terminal state
    Finished { delivered: bool },
}
