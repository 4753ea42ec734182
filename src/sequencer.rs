//! Candidate sequencing.
//!
//! A pass walks a capability's candidate list in order, calling the upstream
//! client once per model until one answers with an extractable result. The
//! bookkeeping lives in [`SequencePass`], a pure reducer over
//! `(model, AttemptOutcome)` pairs, so the control rules can be exercised
//! without a network.

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::extract::ResponseExtractor;
use crate::types::{
    AttemptOutcome, CandidateFailure, CandidateList, CandidateRoster, Capability, Exhaustion,
    RelayRequest, SequenceResult, UnavailableReason,
};
use crate::upstream::UpstreamClient;

/// Body reported when a strict list receives a 2xx that is not JSON.
pub const MALFORMED_STRICT_BODY: &str = "Invalid response from API. Model may be loading.";

/// State of one pass over a candidate list.
#[derive(Debug)]
pub struct SequencePass<'a> {
    capability: Capability,
    list: &'a CandidateList,
    extractor: &'a ResponseExtractor,
    attempted: Vec<String>,
    failures: Vec<CandidateFailure>,
}

impl<'a> SequencePass<'a> {
    pub fn new(
        capability: Capability,
        list: &'a CandidateList,
        extractor: &'a ResponseExtractor,
    ) -> Self {
        Self {
            capability,
            list,
            extractor,
            attempted: Vec::with_capacity(list.len()),
            failures: Vec::with_capacity(list.len()),
        }
    }

    /// Fold one candidate's outcome into the pass. `Break` carries the final
    /// result; `Continue` means the next candidate should be tried.
    pub fn record(&mut self, model: &str, outcome: AttemptOutcome) -> ControlFlow<SequenceResult> {
        self.attempted.push(model.to_string());
        let strict = !self.list.fallback_on_error;

        match outcome {
            AttemptOutcome::Success(raw) => match self.extractor.extract(self.capability, &raw) {
                Some(result) => ControlFlow::Break(SequenceResult::Success {
                    model: model.to_string(),
                    result,
                    raw,
                }),
                None => {
                    self.failures.push(CandidateFailure::Unavailable {
                        model: model.to_string(),
                        reason: UnavailableReason::ExtractionMiss,
                        status: None,
                        detail: format!("no {} result in payload", self.capability),
                    });
                    ControlFlow::Continue(())
                }
            },
            AttemptOutcome::Unavailable {
                reason: UnavailableReason::MalformedResponse,
                ..
            } if strict => {
                self.failures.push(CandidateFailure::Rejected {
                    model: model.to_string(),
                    status: 500,
                    body: MALFORMED_STRICT_BODY.to_string(),
                });
                ControlFlow::Break(self.exhausted())
            }
            AttemptOutcome::Unavailable {
                reason,
                status,
                detail,
            } => {
                self.failures.push(CandidateFailure::Unavailable {
                    model: model.to_string(),
                    reason,
                    status,
                    detail,
                });
                ControlFlow::Continue(())
            }
            AttemptOutcome::HardError { status, body } => {
                self.failures.push(CandidateFailure::Rejected {
                    model: model.to_string(),
                    status,
                    body,
                });
                if strict {
                    ControlFlow::Break(self.exhausted())
                } else {
                    ControlFlow::Continue(())
                }
            }
        }
    }

    /// Close the pass after the last candidate.
    pub fn finish(mut self) -> SequenceResult {
        self.exhausted()
    }

    fn exhausted(&mut self) -> SequenceResult {
        SequenceResult::Exhausted(Exhaustion {
            capability: self.capability,
            attempted: std::mem::take(&mut self.attempted),
            failures: std::mem::take(&mut self.failures),
        })
    }
}

/// Reduce an already-collected series of outcomes into a pass result.
pub fn reduce_outcomes<I>(
    capability: Capability,
    list: &CandidateList,
    extractor: &ResponseExtractor,
    outcomes: I,
) -> SequenceResult
where
    I: IntoIterator<Item = (String, AttemptOutcome)>,
{
    let mut pass = SequencePass::new(capability, list, extractor);
    for (model, outcome) in outcomes {
        if let ControlFlow::Break(result) = pass.record(&model, outcome) {
            return result;
        }
    }
    pass.finish()
}

/// Drives the upstream client over a capability's candidate list.
#[derive(Clone)]
pub struct CandidateSequencer {
    client: Arc<dyn UpstreamClient>,
    roster: CandidateRoster,
    extractor: ResponseExtractor,
}

impl std::fmt::Debug for CandidateSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateSequencer")
            .field("roster", &self.roster)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl CandidateSequencer {
    pub fn new(
        client: Arc<dyn UpstreamClient>,
        roster: CandidateRoster,
        extractor: ResponseExtractor,
    ) -> Self {
        Self {
            client,
            roster,
            extractor,
        }
    }

    pub fn roster(&self) -> &CandidateRoster {
        &self.roster
    }

    /// One pass over the request capability's candidates.
    pub async fn run(&self, request: &RelayRequest) -> SequenceResult {
        let capability = request.capability();
        let list = self.roster.get(capability);
        let total = list.len();
        let mut pass = SequencePass::new(capability, list, &self.extractor);

        for (idx, model) in list.models.iter().enumerate() {
            tracing::info!(
                capability = %capability,
                model = %model,
                position = idx + 1,
                total,
                "trying candidate"
            );
            let outcome = self.client.call(model, request).await;
            match &outcome {
                AttemptOutcome::Success(_) => {}
                AttemptOutcome::Unavailable { status, .. } => tracing::warn!(
                    model = %model,
                    outcome = outcome.label(),
                    status = ?status,
                    "candidate unavailable"
                ),
                AttemptOutcome::HardError { status, .. } => tracing::warn!(
                    model = %model,
                    outcome = outcome.label(),
                    status,
                    "candidate rejected request"
                ),
            }

            match pass.record(model, outcome) {
                ControlFlow::Break(result) => {
                    if let SequenceResult::Success { model, .. } = &result {
                        tracing::info!(capability = %capability, model = %model, "candidate succeeded");
                    }
                    return result;
                }
                ControlFlow::Continue(()) => {}
            }
        }

        let result = pass.finish();
        if let SequenceResult::Exhausted(ex) = &result {
            tracing::warn!(
                capability = %capability,
                attempted = ex.attempted.len(),
                failures = %ex.summary(),
                "all candidates exhausted"
            );
        }
        result
    }
}
