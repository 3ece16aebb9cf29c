#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for ferry
//!
//! This crate handles every outbound HTTP call: discovering upload servers,
//! delivering the archive with failover across them, and sending the final
//! status message to the requester.

mod client;
mod notify;
mod upload;

pub use client::{NetClient, NetConfig};
pub use notify::{HttpNotifier, LogNotifier, Notifier};
pub use upload::{
    CandidateOutcome, EndpointPool, UploadDistributor, UploadFailure, UploadResult,
};
