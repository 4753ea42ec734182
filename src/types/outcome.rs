//! Attempt outcomes and sequencing results.

use serde::Serialize;
use std::fmt;

use super::Capability;

/// Why a candidate was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnavailableReason {
    NotFound,
    StillLoading,
    TimedOut,
    #[serde(rename = "upstream-5xx")]
    Upstream5xx,
    ErrorPage,
    MalformedResponse,
    ExtractionMiss,
    ConnectionFailed,
}

impl UnavailableReason {
    /// Transient reasons are worth another pass after a delay.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StillLoading | Self::TimedOut | Self::Upstream5xx | Self::MalformedResponse
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::StillLoading => "still-loading",
            Self::TimedOut => "timed-out",
            Self::Upstream5xx => "upstream-5xx",
            Self::ErrorPage => "error-page",
            Self::MalformedResponse => "malformed-response",
            Self::ExtractionMiss => "extraction-miss",
            Self::ConnectionFailed => "connection-failed",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one call to one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(serde_json::Value),
    Unavailable {
        reason: UnavailableReason,
        status: Option<u16>,
        detail: String,
    },
    HardError {
        status: u16,
        body: String,
    },
}

impl AttemptOutcome {
    pub fn unavailable(
        reason: UnavailableReason,
        status: Option<u16>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            reason,
            status,
            detail: detail.into(),
        }
    }

    pub fn hard(status: u16, body: impl Into<String>) -> Self {
        Self::HardError {
            status,
            body: body.into(),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Unavailable { reason, .. } => reason.as_str(),
            Self::HardError { .. } => "hard-error",
        }
    }
}

/// Capability-specific result pulled out of a raw payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedResult {
    Summary { text: String },
    Sentiment { label: String, score: f64 },
    /// Only the vector length is surfaced; values stay in the raw payload.
    Embedding { length: usize },
    Caption { text: String },
    Story { text: String },
}

/// A candidate that did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateFailure {
    Unavailable {
        model: String,
        reason: UnavailableReason,
        status: Option<u16>,
        detail: String,
    },
    Rejected {
        model: String,
        status: u16,
        body: String,
    },
}

impl CandidateFailure {
    pub fn model(&self) -> &str {
        match self {
            Self::Unavailable { model, .. } | Self::Rejected { model, .. } => model,
        }
    }

    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable { reason, .. } => reason.is_transient(),
            Self::Rejected { .. } => false,
        }
    }
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable {
                model,
                reason,
                status: Some(status),
                ..
            } => write!(f, "{model}: {reason} ({status})"),
            Self::Unavailable { model, reason, .. } => write!(f, "{model}: {reason}"),
            Self::Rejected { model, status, .. } => write!(f, "{model}: rejected ({status})"),
        }
    }
}

/// Aggregate failure of one sequencing pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exhaustion {
    pub capability: Capability,
    /// Candidates tried, in roster order.
    pub attempted: Vec<String>,
    /// One entry per attempted candidate, same order.
    pub failures: Vec<CandidateFailure>,
}

impl Exhaustion {
    /// At least one candidate reported a loading-style condition.
    pub fn is_transient(&self) -> bool {
        self.failures.iter().any(CandidateFailure::is_transient)
    }

    pub fn last_failure(&self) -> Option<&CandidateFailure> {
        self.failures.last()
    }

    /// One-line summary, e.g. `"a: not-found (404); b: still-loading"`.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Outcome of one sequencing pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceResult {
    Success {
        model: String,
        result: ExtractedResult,
        raw: serde_json::Value,
    },
    Exhausted(Exhaustion),
}

impl SequenceResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Worth another pass: exhausted with at least one transient failure.
    pub fn is_transient_exhaustion(&self) -> bool {
        match self {
            Self::Success { .. } => false,
            Self::Exhausted(ex) => ex.is_transient(),
        }
    }
}
