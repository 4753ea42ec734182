//! Validated relay requests.
//!
//! A `RelayRequest` can only be built through its constructors, which enforce
//! the input bounds. Anything that reaches the sequencer is already valid.

use bytes::Bytes;

use super::Capability;
use crate::defaults::limits;
use crate::error::RelayError;

/// Story generation parameters, already range-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryPrompt {
    pub prompt: String,
    /// Requested output length (1..=1000).
    pub length_hint: u32,
    /// Sampling temperature (0.1..=1.0).
    pub creativity: f64,
}

impl StoryPrompt {
    /// Length actually sent upstream.
    pub fn upstream_max_length(&self) -> u32 {
        self.length_hint.min(limits::UPSTREAM_MAX_LENGTH)
    }

    /// Temperature actually sent upstream.
    pub fn upstream_temperature(&self) -> f64 {
        self.creativity
            .clamp(limits::MIN_TEMPERATURE, limits::MAX_TEMPERATURE)
    }
}

/// Input payload for one capability.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Image { bytes: Bytes, content_type: String },
    Story(StoryPrompt),
}

/// Capability + payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    capability: Capability,
    payload: Payload,
}

impl RelayRequest {
    /// Text-analysis request. Rejects non-text capabilities, blank text and
    /// text over the character limit.
    pub fn text(capability: Capability, text: impl Into<String>) -> Result<Self, RelayError> {
        if !capability.is_text_analysis() {
            return Err(RelayError::InvalidInput(format!(
                "{capability} does not accept a text payload"
            )));
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RelayError::InvalidInput("Missing action or text".into()));
        }
        if text.chars().count() as u64 > limits::MAX_TEXT_CHARS {
            return Err(RelayError::InvalidInput(format!(
                "Text too long (max {} characters)",
                limits::MAX_TEXT_CHARS
            )));
        }
        Ok(Self {
            capability,
            payload: Payload::Text(text),
        })
    }

    /// Image captioning request. The declared content type must be `image/*`.
    pub fn image(bytes: impl Into<Bytes>, content_type: &str) -> Result<Self, RelayError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(RelayError::InvalidInput("Missing image file".into()));
        }
        let content_type = content_type.trim().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(RelayError::InvalidInput(
                "Invalid file type. Please upload an image".into(),
            ));
        }
        Ok(Self {
            capability: Capability::Caption,
            payload: Payload::Image {
                bytes,
                content_type,
            },
        })
    }

    /// Story request. `length_hint` must be within 1..=1000 and `creativity`
    /// within 0.1..=1.0, both inclusive.
    pub fn story(
        prompt: impl Into<String>,
        length_hint: i64,
        creativity: f64,
    ) -> Result<Self, RelayError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(RelayError::InvalidInput("Missing story prompt".into()));
        }
        if !(limits::MIN_STORY_LENGTH..=limits::MAX_STORY_LENGTH).contains(&length_hint) {
            return Err(RelayError::InvalidInput(format!(
                "maxLength must be between {} and {}",
                limits::MIN_STORY_LENGTH,
                limits::MAX_STORY_LENGTH
            )));
        }
        if !(limits::MIN_TEMPERATURE..=limits::MAX_TEMPERATURE).contains(&creativity) {
            return Err(RelayError::InvalidInput(format!(
                "temperature must be between {:.1} and {:.1}",
                limits::MIN_TEMPERATURE,
                limits::MAX_TEMPERATURE
            )));
        }
        Ok(Self {
            capability: Capability::Story,
            payload: Payload::Story(StoryPrompt {
                prompt,
                length_hint: length_hint as u32,
                creativity,
            }),
        })
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}
