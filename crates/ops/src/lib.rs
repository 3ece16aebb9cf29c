#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Build-to-delivery orchestration for ferry
//!
//! This crate sequences the specialized crates into one run: patch, build,
//! verify, archive, upload, then always notify once and always clean up.

mod messages;
mod pipeline;
mod types;

pub use messages::{escape_html, failure_message, success_message};
pub use pipeline::{default_workspace, Pipeline, PipelineBuilder};
pub use types::{Delivery, PipelineReport};

use ferry_errors::Error;

impl PipelineReport {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}
