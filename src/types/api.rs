//! Inbound request and outbound response shapes of the relay API.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ExtractedResult;

/// `POST /api/analyze` body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AnalyzeRequest {
    pub action: Option<String>,
    #[validate(length(max = 10000, message = "Text too long (max 10000 characters)"))]
    pub text: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(action: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            text: Some(text.into()),
        }
    }
}

/// `POST /api/storyteller` body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StoryRequest {
    pub prompt: Option<String>,
    #[serde(rename = "maxLength")]
    #[validate(range(min = 1, max = 1000, message = "maxLength must be between 1 and 1000"))]
    pub max_length: Option<i64>,
    #[validate(range(
        min = 0.1,
        max = 1.0,
        message = "temperature must be between 0.1 and 1.0"
    ))]
    pub temperature: Option<f64>,
}

impl StoryRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Uploaded image for captioning.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    /// Content type declared by the caller, if any.
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: Some(content_type.into()),
            file_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResponse {
    pub model: String,
    /// Raw upstream payload.
    pub data: serde_json::Value,
    pub result: ExtractedResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionResponse {
    pub success: bool,
    pub caption: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryResponse {
    pub model: String,
    pub story: String,
}
