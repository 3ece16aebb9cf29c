//! Tracing setup and structured logging of pipeline events

use ferry_events::{
    AppEvent, BuildEvent, CleanupEvent, GeneralEvent, NotifyEvent, PipelineEvent, UploadEvent,
};
use std::path::PathBuf;
use tracing::{debug, error, info, warn, Level};

const DEFAULT_FILTER: &str = "info,ferry=debug,ferry_ops=info";
const QUIET_FILTER: &str = "info,ferry=info,ferry_ops=info";

/// Directory for `--debug` log files
pub fn log_dir() -> PathBuf {
    std::env::temp_dir().join("ferry").join("logs")
}

fn env_filter(fallback: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback))
}

/// Debug logs go to a JSON file; otherwise console output, suppressed
/// entirely in JSON mode so stdout stays parseable.
pub fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        let dir = log_dir();
        let log_file = dir.join(format!(
            "ferry-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::create_dir_all(&dir).and_then(|()| std::fs::File::create(&log_file)) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(env_filter(DEFAULT_FILTER))
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter(QUIET_FILTER))
            .init();
    }
}

/// One-line human description of an event
fn describe(event: &AppEvent) -> String {
    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => format!("{message} ({context})"),
                None => message.clone(),
            },
            GeneralEvent::Error { message } | GeneralEvent::DebugLog { message } => message.clone(),
        },

        AppEvent::Pipeline(pipeline) => match pipeline {
            PipelineEvent::Started { build_name } => format!("Starting build of {build_name}"),
            PipelineEvent::StageEntered { stage } => format!("Entering stage {stage}"),
            PipelineEvent::Failed {
                stage, trace, hint, ..
            } => match hint {
                Some(hint) => format!("Stage {stage} failed: {trace}\n  hint: {hint}"),
                None => format!("Stage {stage} failed: {trace}"),
            },
            PipelineEvent::Finished { delivered: true } => "Build delivered".to_string(),
            PipelineEvent::Finished { delivered: false } => "Build was not delivered".to_string(),
        },

        AppEvent::Build(build) => match build {
            BuildEvent::ManifestPatched { path, replacements } => {
                format!("Patched {} ({replacements} replacements)", path.display())
            }
            BuildEvent::ManifestPatchFailed { path, error } => {
                format!("Skipping manifest {}: {error}", path.display())
            }
            BuildEvent::ToolchainStarted {
                command,
                working_dir,
            } => format!("Running `{command}` in {}", working_dir.display()),
            BuildEvent::ToolchainExited { exit_code } => match exit_code {
                Some(code) => format!("Toolchain exited with code {code}"),
                None => "Toolchain terminated by signal".to_string(),
            },
            BuildEvent::ArtifactVerified { path } => format!("Found artifact {}", path.display()),
            BuildEvent::ArtifactMissing { path } => {
                format!("Artifact missing: {}", path.display())
            }
            BuildEvent::ArchiveCreated { path, size } => {
                format!("Wrote {} ({size} bytes)", path.display())
            }
            BuildEvent::ArchiveFailed { path, error } => {
                format!("Could not archive {}: {error}", path.display())
            }
        },

        AppEvent::Upload(upload) => match upload {
            UploadEvent::DiscoveryStarted { url } => format!("Discovering upload servers at {url}"),
            UploadEvent::DiscoveryFailed { url, error } => {
                format!("Server discovery at {url} failed: {error}")
            }
            UploadEvent::PoolDiscovered { servers } => {
                format!("{} upload candidates: {}", servers.len(), servers.join(", "))
            }
            UploadEvent::CandidateStarted {
                server, attempt, ..
            } => format!("Uploading to {server} (attempt {attempt})"),
            UploadEvent::CandidateFailed { server, error } => {
                format!("Upload to {server} failed: {error}")
            }
            UploadEvent::Delivered { server, link } => format!("Uploaded to {server}: {link}"),
            UploadEvent::Exhausted { attempted } => {
                format!("All {attempted} upload candidates failed")
            }
        },

        AppEvent::Notify(notify) => match notify {
            NotifyEvent::Sent { recipient } => format!("Notified {recipient}"),
            NotifyEvent::Failed { recipient, error } => {
                format!("Could not notify {recipient}: {error}")
            }
            NotifyEvent::Logged { recipient, text } => {
                format!("No messaging endpoint; message for {recipient}: {text}")
            }
        },

        AppEvent::Cleanup(cleanup) => match cleanup {
            CleanupEvent::Retrying {
                path,
                attempt,
                delay_ms,
            } => format!(
                "{} not empty yet, retry {attempt} in {delay_ms}ms",
                path.display()
            ),
            CleanupEvent::Removed { path } => format!("Removed workspace {}", path.display()),
            CleanupEvent::Failed { path, error } => {
                format!("Could not remove {}: {error}", path.display())
            }
        },
    }
}

/// Log an `AppEvent` at its own level, tagged with its domain target
pub fn log_event_with_tracing(event: &AppEvent) {
    let message = describe(event);
    let domain = event.log_target();
    let fields = event.log_fields();

    let level = event.log_level();
    if level == Level::ERROR {
        error!(domain, fields = %fields, "{message}");
    } else if level == Level::WARN {
        warn!(domain, fields = %fields, "{message}");
    } else if level == Level::INFO {
        info!(domain, fields = %fields, "{message}");
    } else {
        debug!(domain, fields = %fields, "{message}");
    }
}
