#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hfrelay::config::RelayConfig;
use hfrelay::types::{AttemptOutcome, CandidateList, Capability, RelayRequest, UnavailableReason};
use hfrelay::upstream::UpstreamClient;
use serde_json::Value;

/// Upstream stand-in that replays scripted outcomes per model. The last
/// scripted outcome of a model repeats once its queue is drained.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<HashMap<String, VecDeque<AttemptOutcome>>>,
    calls: Mutex<Vec<String>>,
    count: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, model: &str, outcomes: impl IntoIterator<Item = AttemptOutcome>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(model.to_string(), outcomes.into_iter().collect());
        self
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for ScriptedClient {
    async fn call(&self, model: &str, _request: &RelayRequest) -> AttemptOutcome {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(model.to_string());
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(model) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| AttemptOutcome::hard(500, "empty script")),
            None => AttemptOutcome::hard(500, format!("unscripted model {model}")),
        }
    }
}

pub fn success(raw: Value) -> AttemptOutcome {
    AttemptOutcome::Success(raw)
}

pub fn loading() -> AttemptOutcome {
    AttemptOutcome::unavailable(
        UnavailableReason::StillLoading,
        Some(503),
        r#"{"error":"Model is currently loading","estimated_time":20.0}"#,
    )
}

pub fn not_found() -> AttemptOutcome {
    AttemptOutcome::unavailable(UnavailableReason::NotFound, Some(404), "Not Found")
}

/// Config with short candidate lists for caption and story.
pub fn test_config() -> RelayConfig {
    RelayConfig::builder()
        .candidates(Capability::Caption, CandidateList::fallback(["cap-a", "cap-b", "cap-c"]))
        .candidates(Capability::Story, CandidateList::fallback(["story-a", "story-b"]))
        .candidates(Capability::Summarize, CandidateList::single("sum"))
        .candidates(Capability::Sentiment, CandidateList::single("sent"))
        .candidates(Capability::Embed, CandidateList::single("emb"))
        .build()
        .expect("valid test config")
}
