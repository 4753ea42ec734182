//! # hfrelay - fallback relay for hosted inference models
//!
//! Forwards text, image and story requests to a hosted inference API and
//! returns the first usable answer from an ordered list of candidate models.
//!
#![deny(unsafe_code)]

//! ## Pieces
//!
//! - **Upstream client** ([`upstream`]): one bounded call to one model, classified
//!   into success, unavailable (with a reason) or hard error.
//! - **Candidate sequencer** ([`sequencer`]): walks a capability's candidate list
//!   until one model yields an extractable result.
//! - **Response extractor** ([`extract`]): shape-sniffs raw payloads.
//! - **Retry loop** ([`retry`]): re-runs whole passes after a fixed delay while
//!   the failure looks transient.
//! - **Relay service** ([`service`]) and the axum routes ([`server`], feature `server`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hfrelay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::from_env()?;
//!     let service = RelayService::new(&config)?
//!         .with_retry_policy(Some(RetryPolicy::default()));
//!
//!     let summary = service
//!         .analyze(AnalyzeRequest::new("summarize", "Rust is a systems language..."))
//!         .await?;
//!     println!("{} -> {:?}", summary.model, summary.result);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod extract;
pub mod retry;
pub mod sequencer;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod types;
pub mod upstream;
pub mod utils;

/// Commonly used types.
pub mod prelude {
    pub use crate::config::{RelayConfig, RelayConfigBuilder, ServerConfig, UpstreamConfig};
    pub use crate::error::RelayError;
    pub use crate::extract::ResponseExtractor;
    pub use crate::retry::{RetryLoop, RetryPolicy};
    pub use crate::sequencer::CandidateSequencer;
    pub use crate::service::RelayService;
    pub use crate::types::*;
    pub use crate::upstream::{HttpUpstreamClient, UpstreamClient};
}
