use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{ErrorCategory, RelayError};

/// Error response shape for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    Plain,
    Caption,
}

/// A `RelayError` rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError {
    error: RelayError,
    envelope: Envelope,
}

impl ApiError {
    pub fn caption(error: RelayError) -> Self {
        Self {
            error,
            envelope: Envelope::Caption,
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(error: RelayError) -> Self {
        Self {
            error,
            envelope: Envelope::Plain,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.error.category() {
            ErrorCategory::Network
            | ErrorCategory::Parsing
            | ErrorCategory::Configuration
            | ErrorCategory::Internal => {
                tracing::error!(status = status.as_u16(), error = %self.error, "request failed")
            }
            ErrorCategory::Validation => {
                tracing::debug!(error = %self.error, "rejected invalid input")
            }
            _ => tracing::warn!(status = status.as_u16(), error = %self.error, "request failed"),
        }

        let message = self.error.user_message();
        let body = match self.envelope {
            Envelope::Plain => json!({ "error": message }),
            Envelope::Caption => match self.error.attempted_models() {
                Some(models) => json!({
                    "success": false,
                    "error": message,
                    "attempted_models": models,
                }),
                None => json!({ "success": false, "error": message }),
            },
        };
        (status, Json(body)).into_response()
    }
}
