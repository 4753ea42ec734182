//! Upstream client
//!
//! One HTTP call to one named model endpoint, classified into an
//! [`AttemptOutcome`]. The client never retries; the sequencer moves on to the
//! next candidate and the retry loop re-runs whole passes.

pub mod body;
pub mod classify;
mod http;

use async_trait::async_trait;

use crate::types::{AttemptOutcome, RelayRequest};

pub use body::{UpstreamBody, build_body};
pub use classify::classify_response;
pub use http::HttpUpstreamClient;

/// Issues a single call against one model identifier.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn call(&self, model: &str, request: &RelayRequest) -> AttemptOutcome;
}
