//! Type Conversions for RelayError
//!
//! This module contains From trait implementations for converting
//! common error types into RelayError.

use super::types::RelayError;

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for RelayError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Field order is not stable in `ValidationErrors`; pick the first message deterministically.
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {field}"))
                })
            })
            .collect();
        messages.sort();
        Self::InvalidInput(
            messages
                .into_iter()
                .next()
                .unwrap_or_else(|| "invalid input".to_string()),
        )
    }
}
