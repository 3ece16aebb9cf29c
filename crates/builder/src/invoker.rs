//! Launching the external build toolchain

use async_trait::async_trait;
use ferry_config::BuildConfig;
use ferry_errors::{BuildError, Error};
use ferry_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use ferry_types::Platform;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Runs a build against a prepared manifest directory.
///
/// Implementations are not expected to judge success: whether the build
/// worked is decided afterwards by looking for the artifact.
#[async_trait]
pub trait BuildInvoker: Send + Sync {
    /// Run the build for `platform` in `manifest_dir` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error only if the build could not be started at all.
    async fn invoke(
        &self,
        manifest_dir: &Path,
        platform: Platform,
        tx: &EventSender,
    ) -> Result<(), Error>;
}

/// Invokes `<program> <args..> <platform flag>` as a child process
#[derive(Debug, Clone)]
pub struct ToolchainInvoker {
    program: String,
    args: Vec<String>,
    settle_delay: Duration,
}

impl ToolchainInvoker {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            settle_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(config.toolchain.clone(), config.toolchain_args.clone())
            .with_settle_delay(config.settle_delay())
    }

    /// Wait this long before launching, so freshly written manifests are
    /// visible to the toolchain
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    fn command_line(&self, platform: Platform) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        parts.push(platform.toolchain_flag());
        parts.join(" ")
    }
}

#[async_trait]
impl BuildInvoker for ToolchainInvoker {
    async fn invoke(
        &self,
        manifest_dir: &Path,
        platform: Platform,
        tx: &EventSender,
    ) -> Result<(), Error> {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let command = self.command_line(platform);
        tx.emit(AppEvent::Build(BuildEvent::ToolchainStarted {
            command: command.clone(),
            working_dir: manifest_dir.to_path_buf(),
        }));

        // stdio is inherited so the toolchain's own output reaches the console
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(platform.toolchain_flag())
            .current_dir(manifest_dir)
            .status()
            .await
            .map_err(|e| BuildError::ToolchainSpawn {
                command,
                message: e.to_string(),
            })?;

        tx.emit(AppEvent::Build(BuildEvent::ToolchainExited {
            exit_code: status.code(),
        }));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_appends_platform_flag() {
        let invoker = ToolchainInvoker::new("npx", vec!["electron-builder".to_string()]);
        assert_eq!(
            invoker.command_line(Platform::Windows),
            "npx electron-builder --win"
        );
        assert_eq!(
            invoker.command_line(Platform::Linux),
            "npx electron-builder --linux"
        );
    }

    #[test]
    fn test_from_config_uses_settle_delay() {
        let config = BuildConfig::default();
        let invoker = ToolchainInvoker::from_config(&config);
        assert_eq!(invoker.settle_delay, Duration::from_secs(3));
        assert_eq!(invoker.program, "npx");
    }
}
