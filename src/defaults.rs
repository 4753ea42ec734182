//! Default Configuration Values
//!
//! This module centralizes the default values used throughout hfrelay:
//! upstream endpoints, timeouts, retry cadence, input bounds and the stock
//! candidate rosters for every capability.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Base URL of the hosted inference API. Model identifiers are appended as path segments.
    pub const BASE_URL: &str = "https://api-inference.huggingface.co/models";

    /// Hard wall-clock bound for one upstream call.
    ///
    /// Cold models can take well over ten seconds to answer even with
    /// `wait_for_model`, so this stays generous.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("hfrelay/", env!("CARGO_PKG_VERSION"));

    /// Maximum number of body characters echoed into logs.
    pub const LOG_BODY_SAMPLE: usize = 200;
}

/// Caller retry loop defaults
pub mod retry {
    use super::*;

    /// Extra sequencing passes after the first one.
    pub const MAX_EXTRA_ATTEMPTS: u32 = 3;

    /// Fixed delay between passes.
    pub const DELAY: Duration = Duration::from_secs(10);
}

/// Input bounds enforced before any upstream call
pub mod limits {
    /// Maximum text length (in characters) for text analysis.
    pub const MAX_TEXT_CHARS: u64 = 10_000;

    /// Accepted range for the story `maxLength` parameter.
    pub const MIN_STORY_LENGTH: i64 = 1;
    pub const MAX_STORY_LENGTH: i64 = 1000;

    /// Cap applied to `maxLength` before it is sent upstream.
    pub const UPSTREAM_MAX_LENGTH: u32 = 500;

    /// Accepted range for the story `temperature` parameter (inclusive).
    pub const MIN_TEMPERATURE: f64 = 0.1;
    pub const MAX_TEMPERATURE: f64 = 1.0;

    pub const DEFAULT_STORY_LENGTH: i64 = 200;
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;

    /// Maximum accepted upload size for caption requests.
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
}

/// Fixed decoding knobs for story generation. Not caller-configurable.
pub mod story_decoding {
    pub const TOP_P: f64 = 0.9;
    pub const DO_SAMPLE: bool = true;
    pub const RETURN_FULL_TEXT: bool = true;
    pub const REPETITION_PENALTY: f64 = 1.1;
}

/// Stock candidate rosters, in order of preference
pub mod models {
    pub const SUMMARIZE: &str = "sshleifer/distilbart-cnn-12-6";
    pub const SENTIMENT: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";
    pub const EMBED: &str = "sentence-transformers/paraphrase-albert-small-v2";

    pub const CAPTION: &[&str] = &[
        "nlpconnect/vit-gpt2-image-captioning",
        "Salesforce/blip-image-captioning-base",
        "Salesforce/blip-image-captioning-large",
        "microsoft/git-base-coco",
        "microsoft/git-large-coco",
        "Salesforce/blip2-flan-t5-base",
        "Salesforce/blip2-flan-t5-xl",
        "ydshieh/vit-gpt2-coco-en",
        "flax-community/vit-gpt2-coco",
        "IDEA-Research/grounded-sam",
        "openflamingo/OpenFlamingo-9B",
        "liuhaotian/llava-v1.5-7b",
        "gpt2",
    ];

    pub const STORY: &[&str] = &[
        "gemini-2.5-flash",
        "distilgpt2",
        "EleutherAI/gpt-neo-125M",
        "facebook/opt-1.3b",
        "bigscience/bloom-560m",
        "gpt2",
        "mistralai/Mistral-7B-Instruct-v0.3",
        "mistralai/Mistral-Small-24B-Instruct-2501",
        "HuggingFaceH4/zephyr-7b-beta",
    ];
}

/// Server defaults
pub mod server {
    /// Default bind address for the `hfrelay` binary.
    pub const BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);
}
