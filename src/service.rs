//! Relay service
//!
//! Entry points behind the HTTP routes. Each operation validates its input
//! before any upstream call, runs one sequencing pass (or several under a
//! retry policy) and maps the outcome to a response DTO or a [`RelayError`].

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

use crate::config::RelayConfig;
use crate::defaults::limits;
use crate::error::{RelayError, Result};
use crate::extract::ResponseExtractor;
use crate::retry::{RetryLoop, RetryPolicy};
use crate::sequencer::CandidateSequencer;
use crate::types::{
    AnalyzeRequest, AnalyzeResponse, CandidateFailure, CandidateList, CaptionResponse,
    Capability, Exhaustion, ExtractedResult, ImageUpload, RelayRequest, SequenceResult,
    StoryRequest, StoryResponse, UnavailableReason,
};
use crate::upstream::{HttpUpstreamClient, UpstreamClient};
use crate::utils::mime::resolve_upload_type;

const TIMEOUT_MESSAGE: &str =
    "Request timeout - model is loading or responding slowly. Please try again.";
const ERROR_PAGE_MESSAGE: &str = "Service temporarily unavailable. Please try again.";
const EXTRACTION_MISS_MESSAGE: &str = "Unexpected response format from model";

#[derive(Debug)]
struct Inner {
    sequencer: CandidateSequencer,
    retry: Option<RetryLoop>,
}

/// Validating front for the candidate sequencer. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RelayService {
    inner: Arc<Inner>,
}

impl RelayService {
    /// Build a service talking to the configured inference endpoint.
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = HttpUpstreamClient::new(&config.upstream)?;
        Self::with_client(Arc::new(client), config)
    }

    /// Build a service over any upstream client.
    pub fn with_client(client: Arc<dyn UpstreamClient>, config: &RelayConfig) -> Result<Self> {
        config.validate()?;
        let sequencer = CandidateSequencer::new(
            client,
            config.roster.clone(),
            ResponseExtractor::new(config.story_raw_fallback),
        );
        Ok(Self {
            inner: Arc::new(Inner {
                sequencer,
                retry: None,
            }),
        })
    }

    /// Re-run exhausted passes under `policy`; `None` makes every operation a
    /// single pass.
    pub fn with_retry_policy(self, policy: Option<RetryPolicy>) -> Self {
        Self {
            inner: Arc::new(Inner {
                sequencer: self.inner.sequencer.clone(),
                retry: policy.map(RetryLoop::new),
            }),
        }
    }

    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.inner.retry.as_ref().map(RetryLoop::policy)
    }

    /// Summarize, classify or embed a text.
    pub async fn analyze(&self, req: AnalyzeRequest) -> Result<AnalyzeResponse> {
        let span = tracing::info_span!("analyze", request_id = %Uuid::new_v4(), capability = tracing::field::Empty);
        async move {
            let (action, text) = match (req.action.as_deref(), req.text.as_deref()) {
                (Some(a), Some(t)) if !a.trim().is_empty() && !t.trim().is_empty() => (a, t),
                _ => return Err(RelayError::InvalidInput("Missing action or text".into())),
            };
            let capability = Capability::from_action(action)?;
            tracing::Span::current().record("capability", capability.as_str());
            req.validate()?;
            tracing::info!(text_chars = text.chars().count(), "text analysis request");

            let request = RelayRequest::text(capability, text)?;
            match self.execute(&request).await {
                SequenceResult::Success { model, result, raw } => {
                    tracing::info!(model = %model, "text analysis completed");
                    Ok(AnalyzeResponse {
                        model,
                        data: raw,
                        result,
                    })
                }
                SequenceResult::Exhausted(ex) => Err(self.exhaustion_error(ex)),
            }
        }
        .instrument(span)
        .await
    }

    /// Caption an uploaded image.
    pub async fn caption(&self, upload: ImageUpload) -> Result<CaptionResponse> {
        let span = tracing::info_span!("caption", request_id = %Uuid::new_v4());
        async move {
            let content_type = resolve_upload_type(
                &upload.bytes,
                upload.content_type.as_deref(),
                upload.file_name.as_deref(),
            );
            tracing::info!(
                bytes = upload.bytes.len(),
                content_type = %content_type,
                file_name = ?upload.file_name,
                "caption request"
            );
            let request = RelayRequest::image(upload.bytes, &content_type)?;

            match self.execute(&request).await {
                SequenceResult::Success { model, result, .. } => Ok(CaptionResponse {
                    success: true,
                    caption: into_text(result)?,
                    model,
                }),
                SequenceResult::Exhausted(ex) => Err(self.exhaustion_error(ex)),
            }
        }
        .instrument(span)
        .await
    }

    /// Continue a story prompt.
    pub async fn story(&self, req: StoryRequest) -> Result<StoryResponse> {
        let span = tracing::info_span!("story", request_id = %Uuid::new_v4());
        async move {
            let prompt = req
                .prompt
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| RelayError::InvalidInput("Missing story prompt".into()))?;
            req.validate()?;

            let length = req.max_length.unwrap_or(limits::DEFAULT_STORY_LENGTH);
            let temperature = req.temperature.unwrap_or(limits::DEFAULT_TEMPERATURE);
            tracing::info!(length, temperature, "story request");

            let request = RelayRequest::story(prompt, length, temperature)?;
            match self.execute(&request).await {
                SequenceResult::Success { model, result, .. } => Ok(StoryResponse {
                    model,
                    story: into_text(result)?,
                }),
                SequenceResult::Exhausted(ex) => Err(self.exhaustion_error(ex)),
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, request: &RelayRequest) -> SequenceResult {
        let sequencer = &self.inner.sequencer;
        match &self.inner.retry {
            Some(retry) => retry.run(move || sequencer.run(request)).await,
            None => sequencer.run(request).await,
        }
    }

    fn exhaustion_error(&self, ex: Exhaustion) -> RelayError {
        let list = self.inner.sequencer.roster().get(ex.capability);
        exhaustion_to_error(list, ex)
    }
}

/// Map an exhausted pass to the error reported to the caller.
///
/// Strict lists surface the single candidate's failure as precisely as
/// possible; fallback lists report a capability-wide 503 with every model
/// that was tried.
pub fn exhaustion_to_error(list: &CandidateList, ex: Exhaustion) -> RelayError {
    let transient = ex.is_transient();
    let message = ex.capability.exhausted_message();

    if list.fallback_on_error {
        return RelayError::unavailable(message, ex.attempted, transient);
    }

    match ex.failures.last() {
        Some(CandidateFailure::Rejected { status, body, .. }) => RelayError::UpstreamError {
            status: *status,
            body: body.clone(),
        },
        Some(CandidateFailure::Unavailable {
            reason, status, detail, ..
        }) => match reason {
            UnavailableReason::TimedOut => RelayError::TimeoutError(TIMEOUT_MESSAGE.into()),
            UnavailableReason::NotFound => RelayError::UpstreamError {
                status: 404,
                body: detail.clone(),
            },
            UnavailableReason::ErrorPage => RelayError::UpstreamError {
                status: status.unwrap_or(500),
                body: ERROR_PAGE_MESSAGE.into(),
            },
            // 503 and 504 mean a cold model; any other 5xx here was a gateway HTML page.
            UnavailableReason::Upstream5xx => match status {
                Some(s) if !matches!(*s, 503 | 504) => RelayError::UpstreamError {
                    status: *s,
                    body: ERROR_PAGE_MESSAGE.into(),
                },
                _ => RelayError::unavailable(message, ex.attempted, transient),
            },
            UnavailableReason::ExtractionMiss => {
                RelayError::unavailable(EXTRACTION_MISS_MESSAGE, ex.attempted, transient)
            }
            UnavailableReason::ConnectionFailed => RelayError::HttpError(detail.clone()),
            _ => RelayError::unavailable(message, ex.attempted, transient),
        },
        None => RelayError::unavailable(message, ex.attempted, transient),
    }
}

fn into_text(result: ExtractedResult) -> Result<String> {
    match result {
        ExtractedResult::Caption { text } | ExtractedResult::Story { text } => Ok(text),
        other => Err(RelayError::InternalError(format!(
            "unexpected result kind: {other:?}"
        ))),
    }
}
