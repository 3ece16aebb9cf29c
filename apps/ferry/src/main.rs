//! ferry - build, archive, upload and announce an application bundle
//!
//! The binary wires configuration, settings and tracing together and hands
//! the run to the ops crate. Outcomes are reported to the requester and the
//! log only; the process itself always exits normally.

mod cli;
mod events;
mod logging;

use crate::cli::Cli;
use crate::events::EventHandler;
use clap::Parser;
use ferry_config::{BuildSettings, Config};
use ferry_events::{EventEmitter, EventReceiver, EventSender};
use ferry_ops::{default_workspace, Pipeline, PipelineBuilder, PipelineReport};
use ferry_types::BuildRequest;
use std::path::Path;
use tokio::select;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.json, cli.debug);

    info!("Starting ferry v{}", env!("CARGO_PKG_VERSION"));

    if let Some(report) = run(&cli).await {
        if cli.json {
            match report.to_json() {
                Ok(json) => println!("{json}"),
                Err(e) => error!("Failed to render report: {e}"),
            }
        }
    }
}

/// Configuration failures are never fatal: report them and continue on defaults.
async fn load_config(cli: &Cli, tx: &EventSender) -> Config {
    let mut config = match Config::load_or_default(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            tx.emit_warning_with_context("Using default configuration", e.to_string());
            Config::default()
        }
    };

    if let Err(e) = config.merge_env() {
        tx.emit_warning_with_context("Ignoring environment overrides", e.to_string());
    }

    if let Some(platform) = cli.platform {
        config.build.platform = platform;
    }
    config
}

async fn run(cli: &Cli) -> Option<PipelineReport> {
    let (event_sender, mut event_receiver) = ferry_events::channel();
    let mut handler = EventHandler::new(cli.json);

    let config = load_config(cli, &event_sender).await;

    let settings = BuildSettings::load(&cli.settings, &event_sender).await;
    info!(
        origin = ?settings.origin,
        build_name = %settings.build_name.value,
        "Loaded build settings"
    );
    let request = settings.into_request();

    let workspace = match &cli.workspace {
        Some(dir) => dir.clone(),
        None => match std::env::current_dir() {
            Ok(cwd) => default_workspace(&config, &cwd),
            Err(e) => {
                event_sender.emit_error(format!("Cannot determine working directory: {e}"));
                drain_events(&mut event_receiver, &mut handler);
                return None;
            }
        },
    };

    let pipeline = match PipelineBuilder::new()
        .with_config(config)
        .with_event_sender(event_sender.clone())
        .build()
    {
        Ok(pipeline) => pipeline,
        Err(e) => {
            event_sender.emit_error(format!("Cannot set up pipeline: {e}"));
            drain_events(&mut event_receiver, &mut handler);
            return None;
        }
    };

    Some(run_with_events(&pipeline, &request, &workspace, event_receiver, &mut handler).await)
}

fn drain_events(event_receiver: &mut EventReceiver, handler: &mut EventHandler) {
    while let Ok(event) = event_receiver.try_recv() {
        handler.handle_event(&event);
    }
}

/// Run the pipeline while forwarding its events as they arrive
async fn run_with_events(
    pipeline: &Pipeline,
    request: &BuildRequest,
    workspace: &Path,
    mut event_receiver: EventReceiver,
    handler: &mut EventHandler,
) -> PipelineReport {
    let mut run_future = Box::pin(pipeline.run(request, workspace));

    loop {
        select! {
            report = &mut run_future => {
                drain_events(&mut event_receiver, handler);
                return report;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    handler.handle_event(&event);
                }
            }
        }
    }
}
