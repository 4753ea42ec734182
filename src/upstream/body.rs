//! Request body construction per capability.

use bytes::Bytes;
use serde_json::{Value, json};

use crate::defaults::story_decoding;
use crate::types::{Payload, RelayRequest};

/// Body of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    Binary { bytes: Bytes, content_type: String },
}

/// Build the upstream body for `request`.
///
/// Every JSON body asks the provider to wait for a cold model instead of
/// failing fast.
pub fn build_body(request: &RelayRequest) -> UpstreamBody {
    match request.payload() {
        Payload::Text(text) => UpstreamBody::Json(json!({
            "inputs": text.trim(),
            "options": { "wait_for_model": true },
        })),
        Payload::Image {
            bytes,
            content_type,
        } => UpstreamBody::Binary {
            bytes: bytes.clone(),
            content_type: content_type.clone(),
        },
        Payload::Story(story) => UpstreamBody::Json(json!({
            "inputs": story.prompt.trim(),
            "parameters": {
                "max_length": story.upstream_max_length(),
                "temperature": story.upstream_temperature(),
                "top_p": story_decoding::TOP_P,
                "do_sample": story_decoding::DO_SAMPLE,
                "return_full_text": story_decoding::RETURN_FULL_TEXT,
                "repetition_penalty": story_decoding::REPETITION_PENALTY,
            },
            "options": { "wait_for_model": true },
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Capability;

    #[test]
    fn text_body_is_trimmed() {
        let req = RelayRequest::text(Capability::Summarize, "  hello world \n").unwrap();
        assert_eq!(
            build_body(&req),
            UpstreamBody::Json(json!({
                "inputs": "hello world",
                "options": { "wait_for_model": true }
            }))
        );
    }

    #[test]
    fn story_body_clamps_length_and_carries_decoding_knobs() {
        let req = RelayRequest::story(" a lighthouse keeper ", 800, 0.9).unwrap();
        let UpstreamBody::Json(body) = build_body(&req) else {
            panic!("story body must be JSON");
        };
        assert_eq!(body["inputs"], "a lighthouse keeper");
        assert_eq!(body["parameters"]["max_length"], 500);
        assert_eq!(body["parameters"]["temperature"], 0.9);
        assert_eq!(body["parameters"]["top_p"], 0.9);
        assert_eq!(body["parameters"]["do_sample"], true);
        assert_eq!(body["parameters"]["return_full_text"], true);
        assert_eq!(body["parameters"]["repetition_penalty"], 1.1);
        assert_eq!(body["options"]["wait_for_model"], true);
    }

    #[test]
    fn image_body_is_raw_bytes() {
        let req = RelayRequest::image(vec![0x89u8, b'P', b'N', b'G'], "image/png").unwrap();
        assert_eq!(
            build_body(&req),
            UpstreamBody::Binary {
                bytes: Bytes::from_static(&[0x89, b'P', b'N', b'G']),
                content_type: "image/png".into(),
            }
        );
    }
}
