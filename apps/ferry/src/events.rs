//! Event handling and console status

use crate::logging::log_event_with_tracing;
use ferry_events::{AppEvent, PipelineEvent};

/// Forwards events to tracing and, outside JSON mode, prints stage changes
pub struct EventHandler {
    json_mode: bool,
}

impl EventHandler {
    pub fn new(json_mode: bool) -> Self {
        Self { json_mode }
    }

    pub fn handle_event(&mut self, event: &AppEvent) {
        log_event_with_tracing(event);

        if self.json_mode {
            return;
        }
        match event {
            AppEvent::Pipeline(PipelineEvent::StageEntered { stage }) => {
                eprintln!("==> {stage}");
            }
            AppEvent::Pipeline(PipelineEvent::Finished { delivered }) => {
                if *delivered {
                    eprintln!("Build delivered");
                } else {
                    eprintln!("Build failed; see the log for details");
                }
            }
            _ => {}
        }
    }
}
