//! Classification of upstream HTTP responses.
//!
//! Inspects the status code and body text to decide whether a candidate
//! produced a payload, is temporarily unusable, or rejected the request.
//! Loading markers, 404/503/504 and HTML error pages never become hard errors.

use serde_json::Value;

use crate::defaults;
use crate::types::{AttemptOutcome, UnavailableReason};

/// Classify one upstream response.
pub fn classify_response(status: u16, body: &str) -> AttemptOutcome {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let success = (200..300).contains(&status);

    if has_loading_marker(parsed.as_ref(), body, success) {
        return AttemptOutcome::unavailable(
            UnavailableReason::StillLoading,
            Some(status),
            sample(body),
        );
    }

    if !success {
        return match status {
            404 => AttemptOutcome::unavailable(UnavailableReason::NotFound, Some(404), sample(body)),
            // Gateway timeout while a cold model spins up.
            504 => AttemptOutcome::unavailable(
                UnavailableReason::StillLoading,
                Some(504),
                sample(body),
            ),
            503 => AttemptOutcome::unavailable(
                UnavailableReason::Upstream5xx,
                Some(503),
                sample(body),
            ),
            s if is_html_page(body) => {
                let reason = if (500..600).contains(&s) {
                    UnavailableReason::Upstream5xx
                } else {
                    UnavailableReason::ErrorPage
                };
                AttemptOutcome::unavailable(reason, Some(s), sample(body))
            }
            s => AttemptOutcome::hard(s, body),
        };
    }

    match parsed {
        Some(value) => AttemptOutcome::Success(value),
        None => AttemptOutcome::unavailable(
            UnavailableReason::MalformedResponse,
            Some(status),
            sample(body),
        ),
    }
}

/// Loading markers: a JSON object carrying `estimated_time`, or an `error`
/// string mentioning loading. Non-JSON error bodies are searched as plain text.
fn has_loading_marker(parsed: Option<&Value>, body: &str, success: bool) -> bool {
    match parsed {
        Some(Value::Object(obj)) => {
            obj.contains_key("estimated_time")
                || obj
                    .get("error")
                    .and_then(Value::as_str)
                    .is_some_and(|e| e.to_lowercase().contains("loading"))
        }
        Some(_) => false,
        None => !success && !is_html_page(body) && body.to_lowercase().contains("loading"),
    }
}

fn is_html_page(body: &str) -> bool {
    let head = body.trim_start().to_lowercase();
    head.starts_with("<!doctype html") || head.contains("<html")
}

fn sample(body: &str) -> String {
    body.chars().take(defaults::http::LOG_BODY_SAMPLE).collect()
}
