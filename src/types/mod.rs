//! Core data types: capabilities, requests, attempt outcomes and API shapes.

pub mod api;
pub mod capability;
pub mod outcome;
pub mod request;

pub use api::*;
pub use capability::{CandidateList, CandidateRoster, Capability};
pub use outcome::{
    AttemptOutcome, CandidateFailure, Exhaustion, ExtractedResult, SequenceResult,
    UnavailableReason,
};
pub use request::{Payload, RelayRequest, StoryPrompt};
