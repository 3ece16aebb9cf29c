//! Removing the build workspace

use ferry_config::CleanupConfig;
use ferry_errors::Error;
use ferry_events::{AppEvent, CleanupEvent, EventEmitter, EventSender};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Recursively deletes a workspace.
///
/// A "directory not empty" failure is usually the toolchain still releasing
/// file handles, so it is retried after a pause. Every other failure is
/// returned immediately.
#[derive(Debug, Clone)]
pub struct WorkspaceCleaner {
    retries: u32,
    retry_delay: Duration,
}

impl Default for WorkspaceCleaner {
    fn default() -> Self {
        Self::from_config(&CleanupConfig::default())
    }
}

impl WorkspaceCleaner {
    #[must_use]
    pub fn new(retries: u32, retry_delay: Duration) -> Self {
        Self {
            retries,
            retry_delay,
        }
    }

    #[must_use]
    pub fn from_config(config: &CleanupConfig) -> Self {
        Self::new(config.retries, config.retry_delay())
    }

    /// Remove `path` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns the last removal error once retries are used up, or any
    /// non-"not empty" error straight away.
    pub async fn clean(&self, path: &Path, tx: &EventSender) -> Result<(), Error> {
        self.clean_with(path, tx, |p| async move { tokio::fs::remove_dir_all(p).await })
            .await
    }

    /// [`clean`](Self::clean) with a caller-supplied removal function.
    ///
    /// # Errors
    ///
    /// Same as [`clean`](Self::clean).
    pub async fn clean_with<F, Fut>(
        &self,
        path: &Path,
        tx: &EventSender,
        mut remove: F,
    ) -> Result<(), Error>
    where
        F: FnMut(PathBuf) -> Fut,
        Fut: Future<Output = io::Result<()>>,
    {
        let mut attempt = 0;
        loop {
            match remove(path.to_path_buf()).await {
                Ok(()) => {
                    tx.emit(AppEvent::Cleanup(CleanupEvent::Removed {
                        path: path.to_path_buf(),
                    }));
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty && attempt < self.retries => {
                    attempt += 1;
                    tx.emit(AppEvent::Cleanup(CleanupEvent::Retrying {
                        path: path.to_path_buf(),
                        attempt,
                        delay_ms: u64::try_from(self.retry_delay.as_millis()).unwrap_or(u64::MAX),
                    }));
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    tx.emit(AppEvent::Cleanup(CleanupEvent::Failed {
                        path: path.to_path_buf(),
                        error: e.to_string(),
                    }));
                    return Err(Error::io_with_path(&e, path));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_events::channel;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn not_empty() -> io::Error {
        io::Error::from(io::ErrorKind::DirectoryNotEmpty)
    }

    #[tokio::test]
    async fn test_retry_once_then_succeed() {
        let (tx, mut rx) = channel();
        let calls = AtomicU32::new(0);
        let cleaner = WorkspaceCleaner::new(1, Duration::ZERO);

        let result = cleaner
            .clean_with(Path::new("/work"), &tx, |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(not_empty())
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::Cleanup(CleanupEvent::Retrying { attempt: 1, .. })
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::Cleanup(CleanupEvent::Removed { .. })
        ));
    }

    #[tokio::test]
    async fn test_fails_twice_then_raises() {
        let (tx, _rx) = channel();
        let calls = AtomicU32::new(0);
        let cleaner = WorkspaceCleaner::new(1, Duration::ZERO);

        let err = cleaner
            .clean_with(Path::new("/work"), &tx, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(not_empty()) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(err.io_kind(), Some(io::ErrorKind::DirectoryNotEmpty));
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let (tx, _rx) = channel();
        let calls = AtomicU32::new(0);
        let cleaner = WorkspaceCleaner::new(3, Duration::ZERO);

        let err = cleaner
            .clean_with(Path::new("/work"), &tx, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(io::Error::from(io::ErrorKind::PermissionDenied)) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_waits_for_the_configured_delay() {
        let (tx, _rx) = channel();
        let calls = AtomicU32::new(0);
        let cleaner = WorkspaceCleaner::new(1, Duration::from_secs(1));
        let started = tokio::time::Instant::now();

        cleaner
            .clean_with(Path::new("/work"), &tx, |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(not_empty())
                    } else {
                        Ok(())
                    }
                }
            })
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
