//! One-shot status messages to the requester

use crate::client::NetClient;
use async_trait::async_trait;
use ferry_events::{AppEvent, EventEmitter, EventSender, NotifyEvent};
use reqwest::StatusCode;
use serde::Serialize;

/// Best-effort message sink.
///
/// Implementations must not fail the caller: delivery problems are reported
/// through events and otherwise dropped.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, message: &str, tx: &EventSender);
}

#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_notification: bool,
    parse_mode: &'a str,
}

/// Posts messages to a bot-style messaging endpoint
#[derive(Clone)]
pub struct HttpNotifier {
    client: NetClient,
    endpoint: String,
}

impl HttpNotifier {
    #[must_use]
    pub fn new(client: NetClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, recipient: &str, message: &str, tx: &EventSender) {
        let payload = MessagePayload {
            chat_id: recipient,
            text: message,
            disable_notification: true,
            parse_mode: "html",
        };

        let error = match self.client.post_json(&self.endpoint, &payload).await {
            Ok(response) if response.status() == StatusCode::OK => {
                tx.emit(AppEvent::Notify(NotifyEvent::Sent {
                    recipient: recipient.to_string(),
                }));
                return;
            }
            Ok(response) => format!("messaging endpoint returned {}", response.status()),
            Err(e) => e.to_string(),
        };

        tx.emit(AppEvent::Notify(NotifyEvent::Failed {
            recipient: recipient.to_string(),
            error,
        }));
    }
}

/// Used when no messaging endpoint is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient: &str, message: &str, tx: &EventSender) {
        tx.emit(AppEvent::Notify(NotifyEvent::Logged {
            recipient: recipient.to_string(),
            text: message.to_string(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_events::channel;

    #[test]
    fn test_payload_shape() {
        let payload = MessagePayload {
            chat_id: "42",
            text: "<b>hi</b>",
            disable_notification: true,
            parse_mode: "html",
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "chat_id": "42",
                "text": "<b>hi</b>",
                "disable_notification": true,
                "parse_mode": "html"
            })
        );
    }

    #[tokio::test]
    async fn test_log_notifier_emits_message() {
        let (tx, mut rx) = channel();
        LogNotifier.notify("0", "done", &tx).await;

        match rx.try_recv().unwrap() {
            AppEvent::Notify(NotifyEvent::Logged { recipient, text }) => {
                assert_eq!(recipient, "0");
                assert_eq!(text, "done");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
