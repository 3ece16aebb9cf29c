//! Integration tests for events

#[cfg(test)]
mod tests {
    use ferry_events::*;
    use ferry_types::Stage;

    #[tokio::test]
    async fn test_event_emitter_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");
        tx.emit_stage(Stage::Archiving);

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(event1, AppEvent::General(GeneralEvent::Error { .. })));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, AppEvent::General(GeneralEvent::DebugLog { .. })));

        let event3 = rx.recv().await.unwrap();
        assert!(matches!(
            event3,
            AppEvent::Pipeline(PipelineEvent::StageEntered {
                stage: Stage::Archiving
            })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_debug("ignored");
    }

    #[test]
    fn test_warning_with_context() {
        let (tx, mut rx) = channel();
        tx.emit_warning_with_context("using defaults", "/etc/ferry/config.toml");

        match rx.try_recv().unwrap() {
            AppEvent::General(GeneralEvent::Warning { message, context }) => {
                assert_eq!(message, "using defaults");
                assert_eq!(context.as_deref(), Some("/etc/ferry/config.toml"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            AppEvent::General(GeneralEvent::warning_with_context("x", "y")).log_level(),
            tracing::Level::WARN
        );
    }

    #[test]
    fn test_log_levels() {
        let failed = AppEvent::Upload(UploadEvent::CandidateFailed {
            server: "store1".into(),
            error: "boom".into(),
        });
        assert_eq!(failed.log_level(), tracing::Level::WARN);
        assert_eq!(failed.log_target(), "ferry::events::upload");

        let exhausted = AppEvent::Upload(UploadEvent::Exhausted { attempted: 3 });
        assert_eq!(exhausted.log_level(), tracing::Level::ERROR);

        let sent = AppEvent::Notify(NotifyEvent::Sent {
            recipient: "1".into(),
        });
        assert_eq!(sent.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Cleanup(CleanupEvent::Removed {
            path: "/work".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "cleanup");
        assert_eq!(json["event"]["type"], "Removed");
    }
}
