//! Per-capability shape matcher tables.

use serde_json::Value;

use crate::types::ExtractedResult;

/// A named predicate+extractor pair. Returns `None` when the payload does not
/// have this shape.
#[derive(Clone, Copy)]
pub struct ShapeMatcher {
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<ExtractedResult>,
}

impl std::fmt::Debug for ShapeMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeMatcher").field("name", &self.name).finish()
    }
}

pub(super) const SUMMARIZE: &[ShapeMatcher] = &[ShapeMatcher {
    name: "list[0].summary_text",
    extract: summary_text,
}];

pub(super) const SENTIMENT: &[ShapeMatcher] = &[
    ShapeMatcher {
        name: "list[0][0].{label,score}",
        extract: nested_sentiment,
    },
    ShapeMatcher {
        name: "list[0].{label,score}",
        extract: flat_sentiment,
    },
];

pub(super) const EMBED: &[ShapeMatcher] = &[ShapeMatcher {
    name: "numeric vector or matrix",
    extract: embedding,
}];

pub(super) const CAPTION: &[ShapeMatcher] = &[
    ShapeMatcher {
        name: "list[0].generated_text",
        extract: caption_generated_text,
    },
    ShapeMatcher {
        name: "bare string",
        extract: caption_bare_string,
    },
    ShapeMatcher {
        name: "list[0].caption",
        extract: caption_field,
    },
];

pub(super) const STORY: &[ShapeMatcher] = &[ShapeMatcher {
    name: "list[0].generated_text",
    extract: story_generated_text,
}];

pub(super) const STORY_WITH_RAW_FALLBACK: &[ShapeMatcher] = &[
    ShapeMatcher {
        name: "list[0].generated_text",
        extract: story_generated_text,
    },
    ShapeMatcher {
        name: "pretty-printed payload",
        extract: story_raw_dump,
    },
];

fn first_record(raw: &Value) -> Option<&Value> {
    raw.as_array()?.first()
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn first_record_text(raw: &Value, field: &str) -> Option<String> {
    non_blank(first_record(raw)?.get(field))
}

fn summary_text(raw: &Value) -> Option<ExtractedResult> {
    first_record_text(raw, "summary_text").map(|text| ExtractedResult::Summary { text })
}

fn sentiment_record(record: &Value) -> Option<ExtractedResult> {
    let label = non_blank(record.get("label"))?;
    let score = record.get("score")?.as_f64()?;
    (0.0..=1.0)
        .contains(&score)
        .then_some(ExtractedResult::Sentiment { label, score })
}

fn nested_sentiment(raw: &Value) -> Option<ExtractedResult> {
    let inner = first_record(raw)?.as_array()?;
    sentiment_record(inner.first()?)
}

fn flat_sentiment(raw: &Value) -> Option<ExtractedResult> {
    let record = first_record(raw)?;
    if !record.is_object() {
        return None;
    }
    sentiment_record(record)
}

fn embedding(raw: &Value) -> Option<ExtractedResult> {
    let items = raw.as_array().filter(|a| !a.is_empty())?;
    let numeric = |v: &Value| v.is_number();
    let all_numbers = items.iter().all(numeric);
    let all_vectors = items
        .iter()
        .all(|row| row.as_array().is_some_and(|r| !r.is_empty() && r.iter().all(numeric)));
    (all_numbers || all_vectors).then_some(ExtractedResult::Embedding {
        length: items.len(),
    })
}

fn caption_generated_text(raw: &Value) -> Option<ExtractedResult> {
    first_record_text(raw, "generated_text").map(|text| ExtractedResult::Caption { text })
}

fn caption_bare_string(raw: &Value) -> Option<ExtractedResult> {
    non_blank(Some(raw)).map(|text| ExtractedResult::Caption { text })
}

fn caption_field(raw: &Value) -> Option<ExtractedResult> {
    first_record_text(raw, "caption").map(|text| ExtractedResult::Caption { text })
}

fn story_generated_text(raw: &Value) -> Option<ExtractedResult> {
    first_record_text(raw, "generated_text").map(|text| ExtractedResult::Story { text })
}

fn story_raw_dump(raw: &Value) -> Option<ExtractedResult> {
    serde_json::to_string_pretty(raw)
        .ok()
        .map(|text| ExtractedResult::Story { text })
}
