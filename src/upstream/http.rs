//! reqwest-backed upstream client.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use std::time::Duration;

use super::body::{UpstreamBody, build_body};
use super::classify::classify_response;
use super::UpstreamClient;
use crate::config::UpstreamConfig;
use crate::defaults;
use crate::error::RelayError;
use crate::types::{AttemptOutcome, RelayRequest, UnavailableReason};

/// Calls `<base_url>/<model>` with a hard timeout.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl HttpUpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RelayError::ConfigurationError(format!("http client: {e}")))?;
        Self::with_client(http, config)
    }

    /// Reuse an existing reqwest client (shared connection pool).
    pub fn with_client(http: reqwest::Client, config: &UpstreamConfig) -> Result<Self, RelayError> {
        let mut headers = HeaderMap::new();
        match &config.api_key {
            Some(key) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                    .map_err(|e| RelayError::ConfigurationError(format!("invalid API key: {e}")))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => tracing::warn!(
                "no API key configured; upstream calls are unauthenticated and may be rate-limited"
            ),
        }
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model.trim_start_matches('/'))
    }

    async fn send(&self, model: &str, request: &RelayRequest) -> Result<(u16, String), reqwest::Error> {
        let url = self.endpoint(model);
        let builder = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .headers(self.headers.clone());

        let builder = match build_body(request) {
            UpstreamBody::Json(body) => {
                tracing::debug!(
                    url = %url,
                    body = %truncate(&body.to_string()),
                    "sending upstream request"
                );
                builder.json(&body)
            }
            UpstreamBody::Binary {
                bytes,
                content_type,
            } => {
                tracing::debug!(url = %url, bytes = bytes.len(), content_type = %content_type, "sending upstream request");
                builder.header(CONTENT_TYPE, content_type).body(bytes)
            }
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        Ok((status, text))
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn call(&self, model: &str, request: &RelayRequest) -> AttemptOutcome {
        match self.send(model, request).await {
            Ok((status, text)) => {
                tracing::debug!(model, status, body = %truncate(&text), "upstream response");
                classify_response(status, &text)
            }
            Err(err) if err.is_timeout() => {
                tracing::warn!(model, timeout_ms = self.timeout.as_millis() as u64, "upstream call timed out");
                AttemptOutcome::unavailable(UnavailableReason::TimedOut, None, err.to_string())
            }
            Err(err) => {
                tracing::warn!(model, error = %err, "upstream call failed");
                AttemptOutcome::unavailable(
                    UnavailableReason::ConnectionFailed,
                    None,
                    err.to_string(),
                )
            }
        }
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(defaults::http::LOG_BODY_SAMPLE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn endpoint_joins_model_path() {
        let cfg = UpstreamConfig {
            base_url: "http://localhost:9000/models/".into(),
            ..Default::default()
        };
        let client = HttpUpstreamClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint("Salesforce/blip-image-captioning-base"),
            "http://localhost:9000/models/Salesforce/blip-image-captioning-base"
        );
    }

    #[test]
    fn authorization_only_when_key_present() {
        let anon = HttpUpstreamClient::new(&UpstreamConfig::default()).unwrap();
        assert!(anon.headers.get(AUTHORIZATION).is_none());

        let cfg = UpstreamConfig {
            api_key: Some(SecretString::from("hf_abc".to_string())),
            ..Default::default()
        };
        let authed = HttpUpstreamClient::new(&cfg).unwrap();
        assert_eq!(authed.headers.get(AUTHORIZATION).unwrap(), "Bearer hf_abc");
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let cfg = UpstreamConfig {
            api_key: Some(SecretString::from("hf_topsecret".to_string())),
            ..Default::default()
        };
        let client = HttpUpstreamClient::new(&cfg).unwrap();
        let printed = format!("{client:?}");
        assert!(!printed.contains("hf_topsecret"), "{printed}");
        assert!(client.headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn rejects_api_key_with_control_characters() {
        let cfg = UpstreamConfig {
            api_key: Some(SecretString::from("hf_abc\n".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            HttpUpstreamClient::new(&cfg),
            Err(RelayError::ConfigurationError(_))
        ));
    }
}
