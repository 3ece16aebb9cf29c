//! Orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum OpsError {
    #[error("component not found: {component}")]
    MissingComponent { component: String },

    #[error("delivery failed: {reason}")]
    DeliveryFailed { reason: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DeliveryFailed { .. } => {
                Some("Every upload server refused the archive; try again later.")
            }
            Self::MissingComponent { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::DeliveryFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::DeliveryFailed { .. } => "ops.delivery_failed",
        };
        Some(code)
    }
}
