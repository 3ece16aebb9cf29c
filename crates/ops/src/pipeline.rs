//! The build-to-delivery state machine

use crate::messages::{failure_message, success_message};
use crate::types::{Delivery, PipelineReport};
use ferry_builder::{
    apply_patches, create_archive, verify_artifact, BuildInvoker, ManifestPatch,
    ToolchainInvoker, WorkspaceCleaner,
};
use ferry_config::Config;
use ferry_errors::{render_chain, BuildError, Error, OpsError, UserFacingError};
use ferry_events::{AppEvent, EventEmitter, EventSender, PipelineEvent};
use ferry_net::{
    HttpNotifier, LogNotifier, NetClient, NetConfig, Notifier, UploadDistributor, UploadFailure,
    UploadResult,
};
use ferry_types::{ArchiveArtifact, BuildRequest, Stage};
use std::path::{Path, PathBuf};

/// A delivery-path failure and the stage it happened in
struct StageFailure {
    stage: Stage,
    error: Error,
}

impl StageFailure {
    fn at(stage: Stage) -> impl FnOnce(Error) -> Self {
        move |error| Self { stage, error }
    }
}

/// One configured pipeline. Construct with [`PipelineBuilder`].
pub struct Pipeline {
    config: Config,
    invoker: Box<dyn BuildInvoker>,
    notifier: Box<dyn Notifier>,
    distributor: UploadDistributor,
    cleaner: WorkspaceCleaner,
    tx: EventSender,
}

impl EventEmitter for Pipeline {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl Pipeline {
    /// Run the whole pipeline for `request` inside `workspace`.
    ///
    /// Never fails. Exactly one message is sent to the requester, and removing
    /// `workspace` is attempted exactly once, whatever happened before.
    pub async fn run(&self, request: &BuildRequest, workspace: &Path) -> PipelineReport {
        let mut stages = Vec::new();
        self.emit(AppEvent::Pipeline(PipelineEvent::Started {
            build_name: request.name().to_string(),
        }));

        let title = &self.config.notify.title;
        let (delivery, message) = match self.deliver(request, workspace, &mut stages).await {
            Ok(link) => {
                let message = success_message(title, &link);
                (Delivery::Delivered { link }, message)
            }
            Err(failure) => {
                self.report_failure(&failure);
                stages.push(Stage::Failed);
                (
                    Delivery::Failed {
                        stage: failure.stage,
                        reason: failure.error.to_string(),
                    },
                    failure_message(title),
                )
            }
        };

        self.enter(&mut stages, Stage::Notifying);
        self.notifier
            .notify(request.recipient(), &message, &self.tx)
            .await;

        self.enter(&mut stages, Stage::Cleaning);
        // the cleaner reports its own failure; it must not mask the outcome
        let cleanup_ok = self.cleaner.clean(workspace, &self.tx).await.is_ok();

        self.enter(&mut stages, Stage::Done);
        self.emit(AppEvent::Pipeline(PipelineEvent::Finished {
            delivered: delivery.is_delivered(),
        }));

        PipelineReport {
            stages,
            delivery,
            cleanup_ok,
        }
    }

    /// PATCHING through UPLOADING. Returns the retrieval link.
    async fn deliver(
        &self,
        request: &BuildRequest,
        workspace: &Path,
        stages: &mut Vec<Stage>,
    ) -> Result<String, StageFailure> {
        let platform = self.config.build.platform;

        self.enter(stages, Stage::Patching);
        let manifest = workspace.join(&self.config.build.manifest);
        // unreadable manifests are reported and skipped
        apply_patches(&[ManifestPatch::for_request(manifest, request)], &self.tx).await;

        self.enter(stages, Stage::Building);
        self.invoker
            .invoke(workspace, platform, &self.tx)
            .await
            .map_err(StageFailure::at(Stage::Building))?;

        self.enter(stages, Stage::Verifying);
        let artifact = verify_artifact(workspace, request.name(), platform, &self.tx)
            .await
            .map_err(StageFailure::at(Stage::Verifying))?;

        self.enter(stages, Stage::Archiving);
        let archive = self
            .archive(&artifact, workspace)
            .await
            .map_err(StageFailure::at(Stage::Archiving))?;

        self.enter(stages, Stage::Uploading);
        match self.distributor.upload(archive, &self.tx).await {
            UploadResult::Delivered { link, .. } => Ok(link),
            UploadResult::Failed(failure) => Err(StageFailure {
                stage: Stage::Uploading,
                error: OpsError::DeliveryFailed {
                    reason: describe_upload_failure(&failure),
                }
                .into(),
            }),
        }
    }

    /// Compress the artifact, then confirm the archive is really on disk
    async fn archive(&self, artifact: &Path, workspace: &Path) -> Result<ArchiveArtifact, Error> {
        let dest = workspace.join(&self.config.build.archive_name);
        create_archive(
            artifact,
            &dest,
            self.config.build.compression_level,
            &self.tx,
        )
        .await?;

        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            Ok(ArchiveArtifact::new(dest))
        } else {
            Err(BuildError::ArchiveMissing {
                path: dest.display().to_string(),
            }
            .into())
        }
    }

    fn enter(&self, stages: &mut Vec<Stage>, stage: Stage) {
        stages.push(stage);
        self.emit_stage(stage);
    }

    fn report_failure(&self, failure: &StageFailure) {
        self.emit(AppEvent::Pipeline(PipelineEvent::Failed {
            stage: failure.stage,
            code: failure.error.user_code().map(str::to_string),
            message: failure.error.user_message().into_owned(),
            hint: failure.error.user_hint().map(str::to_string),
            retryable: failure.error.is_retryable(),
            trace: render_chain(&failure.error),
        }));
    }
}

fn describe_upload_failure(failure: &UploadFailure) -> String {
    match failure {
        UploadFailure::Discovery { reason } => format!("server discovery failed: {reason}"),
        UploadFailure::Exhausted { attempted } => {
            format!("all {attempted} upload candidates failed")
        }
    }
}

/// Builder for [`Pipeline`]
///
/// Only the event sender is required. Everything else defaults from the
/// configuration: the toolchain invoker, the upload distributor, and an HTTP
/// notifier when a messaging endpoint is configured (log-only otherwise).
pub struct PipelineBuilder {
    config: Option<Config>,
    invoker: Option<Box<dyn BuildInvoker>>,
    notifier: Option<Box<dyn Notifier>>,
    net: Option<NetClient>,
    tx: Option<EventSender>,
}

impl PipelineBuilder {
    /// Create new pipeline builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            invoker: None,
            notifier: None,
            net: None,
            tx: None,
        }
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the build invoker
    #[must_use]
    pub fn with_invoker(mut self, invoker: impl BuildInvoker + 'static) -> Self {
        self.invoker = Some(Box::new(invoker));
        self
    }

    /// Set the notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build the pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if no event sender was set or the HTTP client cannot
    /// be created.
    pub fn build(self) -> Result<Pipeline, Error> {
        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;
        let config = self.config.unwrap_or_default();

        let net = match self.net {
            Some(net) => net,
            None => NetClient::new(&NetConfig::from_upload(&config.upload))?,
        };

        let invoker: Box<dyn BuildInvoker> = match self.invoker {
            Some(invoker) => invoker,
            None => Box::new(ToolchainInvoker::from_config(&config.build)),
        };

        let notifier: Box<dyn Notifier> = match (self.notifier, &config.notify.endpoint) {
            (Some(notifier), _) => notifier,
            (None, Some(endpoint)) => Box::new(HttpNotifier::new(net.clone(), endpoint.clone())),
            (None, None) => Box::new(LogNotifier),
        };

        Ok(Pipeline {
            distributor: UploadDistributor::from_config(net, &config.upload),
            cleaner: WorkspaceCleaner::from_config(&config.cleanup),
            invoker,
            notifier,
            tx,
            config,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Default workspace: the directory the manifest lives in
#[must_use]
pub fn default_workspace(config: &Config, cwd: &Path) -> PathBuf {
    cwd.join(&config.build.manifest)
        .parent()
        .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
}
