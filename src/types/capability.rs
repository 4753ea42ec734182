//! Capabilities and their candidate rosters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::error::RelayError;

/// One supported task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Summarize,
    Sentiment,
    Embed,
    Caption,
    Story,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Summarize,
        Capability::Sentiment,
        Capability::Embed,
        Capability::Caption,
        Capability::Story,
    ];

    /// Capabilities reachable through the text-analysis route.
    pub const TEXT_ANALYSIS: [Capability; 3] = [
        Capability::Summarize,
        Capability::Sentiment,
        Capability::Embed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Sentiment => "sentiment",
            Self::Embed => "embed",
            Self::Caption => "caption",
            Self::Story => "story",
        }
    }

    pub fn is_text_analysis(&self) -> bool {
        Self::TEXT_ANALYSIS.contains(self)
    }

    /// Parse a text-analysis action name (`summarize`, `sentiment`, `embed`).
    pub fn from_action(action: &str) -> Result<Self, RelayError> {
        match action.parse::<Capability>() {
            Ok(cap) if cap.is_text_analysis() => Ok(cap),
            _ => Err(RelayError::InvalidInput(format!(
                "Invalid action. Must be one of: {}",
                Self::TEXT_ANALYSIS
                    .iter()
                    .map(Capability::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// User-facing message when every candidate of a fallback roster failed.
    pub fn exhausted_message(&self) -> &'static str {
        match self {
            Self::Caption => {
                "All captioning models are currently unavailable (Free Tier). Please try again later."
            }
            Self::Story => "All fallback models failed. Please try again later.",
            Self::Summarize | Self::Sentiment | Self::Embed => {
                "Model is loading or timed out. Please try again in 10-20 seconds."
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RelayError::InvalidInput(format!("unknown capability: {s}")))
    }
}

/// Ordered candidate models for one capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateList {
    pub models: Vec<String>,
    /// `false` makes the list strict: a hard error ends the pass and a
    /// malformed 2xx body counts as a hard error.
    pub fallback_on_error: bool,
}

impl CandidateList {
    /// A strict single-model list (text analysis).
    pub fn single(model: impl Into<String>) -> Self {
        Self {
            models: vec![model.into()],
            fallback_on_error: false,
        }
    }

    /// A fallback chain tried in order.
    pub fn fallback<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: models.into_iter().map(Into::into).collect(),
            fallback_on_error: true,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn validate(&self, capability: Capability) -> Result<(), RelayError> {
        if self.models.is_empty() {
            return Err(RelayError::ConfigurationError(format!(
                "{capability}: candidate list must not be empty"
            )));
        }
        if let Some(blank) = self.models.iter().find(|m| m.trim().is_empty()) {
            return Err(RelayError::ConfigurationError(format!(
                "{capability}: blank model identifier {blank:?}"
            )));
        }
        for (idx, model) in self.models.iter().enumerate() {
            if self.models[..idx].contains(model) {
                return Err(RelayError::ConfigurationError(format!(
                    "{capability}: duplicate model identifier {model}"
                )));
            }
        }
        if !self.fallback_on_error && self.models.len() != 1 {
            return Err(RelayError::ConfigurationError(format!(
                "{capability}: a strict candidate list must name exactly one model"
            )));
        }
        Ok(())
    }
}

/// Candidate lists for every capability, fixed at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRoster {
    pub summarize: CandidateList,
    pub sentiment: CandidateList,
    pub embed: CandidateList,
    pub caption: CandidateList,
    pub story: CandidateList,
}

impl Default for CandidateRoster {
    fn default() -> Self {
        Self {
            summarize: CandidateList::single(defaults::models::SUMMARIZE),
            sentiment: CandidateList::single(defaults::models::SENTIMENT),
            embed: CandidateList::single(defaults::models::EMBED),
            caption: CandidateList::fallback(defaults::models::CAPTION.iter().copied()),
            story: CandidateList::fallback(defaults::models::STORY.iter().copied()),
        }
    }
}

impl CandidateRoster {
    pub fn get(&self, capability: Capability) -> &CandidateList {
        match capability {
            Capability::Summarize => &self.summarize,
            Capability::Sentiment => &self.sentiment,
            Capability::Embed => &self.embed,
            Capability::Caption => &self.caption,
            Capability::Story => &self.story,
        }
    }

    pub fn set(&mut self, capability: Capability, list: CandidateList) {
        match capability {
            Capability::Summarize => self.summarize = list,
            Capability::Sentiment => self.sentiment = list,
            Capability::Embed => self.embed = list,
            Capability::Caption => self.caption = list,
            Capability::Story => self.story = list,
        }
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        for cap in Capability::ALL {
            self.get(cap).validate(cap)?;
        }
        Ok(())
    }
}
