//! Integration tests for config

#[cfg(test)]
mod tests {
    use ferry_config::*;
    use ferry_types::Platform;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::{tempdir, NamedTempFile};

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[build]
toolchain = "pnpm"
toolchain_args = ["exec", "electron-builder"]
platform = "macos"
settle_delay_ms = 0

[upload]
url_template = "http://127.0.0.1:9000/{{server}}/uploadFile"

[notify]
endpoint = "http://127.0.0.1:9000/send"
title = "Nightly"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.build.toolchain, "pnpm");
        assert_eq!(config.build.toolchain_args, ["exec", "electron-builder"]);
        assert_eq!(config.build.platform, Platform::MacOs);
        assert_eq!(config.build.settle_delay_ms, 0);
        assert_eq!(
            config.upload.url_template,
            "http://127.0.0.1:9000/{server}/uploadFile"
        );
        assert_eq!(
            config.notify.endpoint.as_deref(),
            Some("http://127.0.0.1:9000/send")
        );
        assert_eq!(config.notify.title, "Nightly");
        // Untouched sections keep their defaults
        assert_eq!(config.cleanup.retries, 1);
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ferry_errors::Error::Config(ferry_errors::ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("FERRY_PLATFORM", "linux");
        std::env::set_var("FERRY_SETTLE_DELAY_MS", "250");
        std::env::set_var("FERRY_NOTIFY_ENDPOINT", "http://localhost/send");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.build.platform, Platform::Linux);
        assert_eq!(config.build.settle_delay_ms, 250);
        assert_eq!(
            config.notify.endpoint.as_deref(),
            Some("http://localhost/send")
        );

        std::env::remove_var("FERRY_PLATFORM");
        std::env::remove_var("FERRY_SETTLE_DELAY_MS");
        std::env::remove_var("FERRY_NOTIFY_ENDPOINT");
    }

    #[test]
    fn test_merge_env_rejects_bad_values() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("FERRY_PLATFORM", "amiga");
        let mut config = Config::default();
        let result = config.merge_env();
        std::env::remove_var("FERRY_PLATFORM");

        assert!(matches!(
            result,
            Err(ferry_errors::Error::Config(
                ferry_errors::ConfigError::InvalidValue { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_settings_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(settings::SETTINGS_FILE);
        std::fs::write(
            &path,
            r#"{"customer_id": "77", "build_name": "Host", "build_version": "2.1.0"}"#,
        )
        .unwrap();

        let (tx, mut rx) = ferry_events::channel();
        let settings = BuildSettings::load(&path, &tx).await;
        assert_eq!(settings.origin, SettingsOrigin::Parsed);
        assert!(rx.try_recv().is_err());
        assert_eq!(settings.customer_id.value, "77");

        let request = settings.into_request();
        assert_eq!(request.recipient(), "77");
        assert_eq!(request.version(), "2.1.0");
        assert_eq!(request.description(), "Application by Host");
    }

    #[tokio::test]
    async fn test_settings_missing_file() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = ferry_events::channel();
        let settings = BuildSettings::load(&dir.path().join("settings.json"), &tx).await;
        assert_eq!(settings.origin, SettingsOrigin::Missing);
        assert_eq!(settings, BuildSettings::default());
    }

    #[tokio::test]
    async fn test_settings_corrupt_file_warns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(settings::SETTINGS_FILE);
        std::fs::write(&path, "[1, 2").unwrap();

        let (tx, mut rx) = ferry_events::channel();
        let loaded = BuildSettings::load(&path, &tx).await;
        assert_eq!(loaded.origin, SettingsOrigin::Corrupt);
        assert_eq!(loaded.build_name.value, settings::DEFAULT_BUILD_NAME);

        match rx.try_recv().unwrap() {
            ferry_events::AppEvent::General(ferry_events::GeneralEvent::Warning {
                context, ..
            }) => assert_eq!(context, Some(path.display().to_string())),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
