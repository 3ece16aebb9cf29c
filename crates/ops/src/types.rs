//! Types for pipeline results

use ferry_types::Stage;
use serde::Serialize;

/// How the run ended for the requester
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    /// The archive is downloadable at `link`
    Delivered { link: String },
    /// A delivery-path stage failed; `reason` is for local logs only
    Failed { stage: Stage, reason: String },
}

impl Delivery {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Summary of one pipeline run
#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    /// Stages entered, in order, including `Failed` when it occurred
    pub stages: Vec<Stage>,
    pub delivery: Delivery,
    /// Whether the workspace was removed
    pub cleanup_ok: bool,
}

impl PipelineReport {
    #[must_use]
    pub fn visited(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}
