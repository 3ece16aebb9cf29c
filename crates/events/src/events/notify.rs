use serde::{Deserialize, Serialize};

/// Notifier events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotifyEvent {
    /// The messaging endpoint accepted the message
    Sent { recipient: String },

    /// The message could not be delivered; the run is unaffected
    Failed { recipient: String, error: String },

    /// No messaging endpoint is configured; the message was only logged
    Logged { recipient: String, text: String },
}
