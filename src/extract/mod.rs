//! Response shape sniffing.
//!
//! Hosted models answer the same task with differently shaped JSON. Each
//! capability owns an ordered table of [`ShapeMatcher`]s; the first matcher
//! that recognises the payload produces the result. Matchers never accept
//! blank strings or empty vectors, so a `Some` is always usable.

mod matchers;

use serde_json::Value;

use crate::types::{Capability, ExtractedResult};

pub use matchers::ShapeMatcher;

/// Extracts a capability-specific result from a raw upstream payload.
#[derive(Debug, Clone, Copy)]
pub struct ResponseExtractor {
    story_raw_fallback: bool,
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self {
            story_raw_fallback: true,
        }
    }
}

impl ResponseExtractor {
    /// `story_raw_fallback` makes the story capability return the pretty-printed
    /// payload when no `generated_text` is present, instead of reporting a miss.
    pub fn new(story_raw_fallback: bool) -> Self {
        Self { story_raw_fallback }
    }

    /// Matchers consulted for `capability`, in priority order.
    pub fn matchers(&self, capability: Capability) -> &'static [ShapeMatcher] {
        match capability {
            Capability::Summarize => matchers::SUMMARIZE,
            Capability::Sentiment => matchers::SENTIMENT,
            Capability::Embed => matchers::EMBED,
            Capability::Caption => matchers::CAPTION,
            Capability::Story if self.story_raw_fallback => matchers::STORY_WITH_RAW_FALLBACK,
            Capability::Story => matchers::STORY,
        }
    }

    pub fn extract(&self, capability: Capability, raw: &Value) -> Option<ExtractedResult> {
        self.matchers(capability).iter().find_map(|m| {
            let hit = (m.extract)(raw);
            if hit.is_some() {
                tracing::trace!(capability = %capability, shape = m.name, "payload shape matched");
            }
            hit
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(cap: Capability, raw: Value) -> Option<ExtractedResult> {
        ResponseExtractor::default().extract(cap, &raw)
    }

    #[test]
    fn summarize_reads_first_summary_text() {
        assert_eq!(
            extract(Capability::Summarize, json!([{ "summary_text": "abc" }])),
            Some(ExtractedResult::Summary { text: "abc".into() })
        );
        assert_eq!(extract(Capability::Summarize, json!([{ "summary_text": "  " }])), None);
        assert_eq!(extract(Capability::Summarize, json!([])), None);
        assert_eq!(extract(Capability::Summarize, json!({ "summary_text": "abc" })), None);
    }

    #[test]
    fn sentiment_reads_nested_record() {
        assert_eq!(
            extract(
                Capability::Sentiment,
                json!([[{ "label": "POSITIVE", "score": 0.87 }, { "label": "NEGATIVE", "score": 0.13 }]])
            ),
            Some(ExtractedResult::Sentiment {
                label: "POSITIVE".into(),
                score: 0.87
            })
        );
    }

    #[test]
    fn sentiment_accepts_flat_list_and_rejects_bad_scores() {
        assert_eq!(
            extract(Capability::Sentiment, json!([{ "label": "NEGATIVE", "score": 0.6 }])),
            Some(ExtractedResult::Sentiment {
                label: "NEGATIVE".into(),
                score: 0.6
            })
        );
        assert_eq!(
            extract(Capability::Sentiment, json!([[{ "label": "POSITIVE", "score": 1.7 }]])),
            None
        );
        assert_eq!(extract(Capability::Sentiment, json!([[{ "score": 0.5 }]])), None);
        assert_eq!(extract(Capability::Sentiment, json!([[]])), None);
    }

    #[test]
    fn embed_surfaces_length_only() {
        assert_eq!(
            extract(Capability::Embed, json!([0.1, 0.2, 0.3])),
            Some(ExtractedResult::Embedding { length: 3 })
        );
        assert_eq!(
            extract(Capability::Embed, json!([[0.1, 0.2], [0.3, 0.4]])),
            Some(ExtractedResult::Embedding { length: 2 })
        );
        assert_eq!(extract(Capability::Embed, json!([])), None);
        assert_eq!(extract(Capability::Embed, json!(["a", "b"])), None);
    }

    #[test]
    fn caption_shapes_in_priority_order() {
        assert_eq!(
            extract(Capability::Caption, json!([{ "generated_text": "a dog" }])),
            Some(ExtractedResult::Caption { text: "a dog".into() })
        );
        assert_eq!(
            extract(Capability::Caption, json!("a cat on a mat")),
            Some(ExtractedResult::Caption {
                text: "a cat on a mat".into()
            })
        );
        assert_eq!(
            extract(Capability::Caption, json!([{ "caption": "a bird" }])),
            Some(ExtractedResult::Caption { text: "a bird".into() })
        );
        // generated_text wins over caption when both are present
        assert_eq!(
            extract(
                Capability::Caption,
                json!([{ "generated_text": "first", "caption": "second" }])
            ),
            Some(ExtractedResult::Caption { text: "first".into() })
        );
        // a blank generated_text falls through to caption
        assert_eq!(
            extract(
                Capability::Caption,
                json!([{ "generated_text": " ", "caption": "second" }])
            ),
            Some(ExtractedResult::Caption { text: "second".into() })
        );
        assert_eq!(extract(Capability::Caption, json!("   ")), None);
        assert_eq!(extract(Capability::Caption, json!({ "error": "x" })), None);
    }

    #[test]
    fn story_prefers_generated_text() {
        assert_eq!(
            extract(
                Capability::Story,
                json!([{ "generated_text": "Once upon a time" }])
            ),
            Some(ExtractedResult::Story {
                text: "Once upon a time".into()
            })
        );
    }

    #[test]
    fn story_falls_back_to_pretty_printed_payload() {
        let raw = json!([{}]);
        let expected = serde_json::to_string_pretty(&raw).unwrap();
        assert_eq!(
            extract(Capability::Story, raw),
            Some(ExtractedResult::Story { text: expected })
        );
    }

    #[test]
    fn story_fallback_can_be_disabled() {
        let extractor = ResponseExtractor::new(false);
        assert_eq!(extractor.extract(Capability::Story, &json!([{}])), None);
    }

    #[test]
    fn only_story_has_a_raw_fallback() {
        for cap in [
            Capability::Summarize,
            Capability::Sentiment,
            Capability::Embed,
            Capability::Caption,
        ] {
            assert_eq!(extract(cap, json!([{}])), None, "{cap}");
        }
    }
}
