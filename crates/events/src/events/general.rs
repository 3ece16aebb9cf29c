use serde::{Deserialize, Serialize};

/// Events raised outside the pipeline proper: configuration fallbacks and
/// setup failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    /// Something was ignored or replaced by a default
    Warning {
        message: String,
        context: Option<String>,
    },

    /// The run could not be set up
    Error { message: String },

    DebugLog { message: String },
}

impl GeneralEvent {
    pub fn warning_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::DebugLog {
            message: message.into(),
        }
    }
}
