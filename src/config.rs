//! Relay configuration.
//!
//! `RelayConfig` bundles the upstream HTTP settings, the candidate roster, the
//! retry policy and the server settings. Build it with `RelayConfig::builder()`
//! or load it from the environment with `RelayConfig::from_env()`.
//!
//! Recognised environment variables:
//!
//! | variable | meaning |
//! |---|---|
//! | `HF_API_KEY` | bearer token for the inference API (optional) |
//! | `HFRELAY_BASE_URL` | base URL, model ids are appended |
//! | `HFRELAY_TIMEOUT_SECS` | per-call timeout |
//! | `HFRELAY_BIND` | server bind address |
//! | `HFRELAY_SERVER_RETRY` | run the delayed retry loop inside request handlers |
//! | `HFRELAY_STORY_RAW_FALLBACK` | return the raw payload when a story model has no `generated_text` |

use secrecy::SecretString;
use std::net::SocketAddr;
use std::time::Duration;

use crate::defaults;
use crate::error::RelayError;
use crate::retry::RetryPolicy;
use crate::types::{CandidateList, CandidateRoster, Capability};

/// Settings for the outbound HTTP client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Bearer token; requests go out unauthenticated when absent.
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::http::BASE_URL.to_string(),
            api_key: None,
            timeout: defaults::http::REQUEST_TIMEOUT,
            connect_timeout: defaults::http::CONNECT_TIMEOUT,
            user_agent: defaults::http::USER_AGENT.to_string(),
        }
    }
}

/// Settings for the inbound HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    /// Run the delayed retry loop inside request handlers instead of leaving
    /// retries to the browser.
    pub retry_in_handlers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(defaults::server::BIND_ADDR),
            max_upload_bytes: defaults::limits::MAX_UPLOAD_BYTES,
            retry_in_handlers: false,
        }
    }
}

/// Complete relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub upstream: UpstreamConfig,
    pub roster: CandidateRoster,
    pub retry: RetryPolicy,
    /// Return a pretty-printed payload when a story model answers without `generated_text`.
    pub story_raw_fallback: bool,
    pub server: ServerConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        let builder = RelayConfigBuilder::new();
        Self {
            upstream: builder.upstream,
            roster: builder.roster,
            retry: builder.retry,
            story_raw_fallback: builder.story_raw_fallback,
            server: builder.server,
        }
    }
}

impl RelayConfig {
    /// Returns a builder for constructing `RelayConfig`
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::new()
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = RelayConfigBuilder::new();

        if let Some(key) = lookup("HF_API_KEY").filter(|k| !k.trim().is_empty()) {
            builder = builder.api_key(key);
        }
        if let Some(url) = lookup("HFRELAY_BASE_URL") {
            builder = builder.base_url(url);
        }
        if let Some(secs) = lookup("HFRELAY_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                RelayError::ConfigurationError(format!("HFRELAY_TIMEOUT_SECS: not a number: {secs}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(addr) = lookup("HFRELAY_BIND") {
            let addr: SocketAddr = addr.trim().parse().map_err(|_| {
                RelayError::ConfigurationError(format!("HFRELAY_BIND: invalid address: {addr}"))
            })?;
            builder = builder.bind_addr(addr);
        }
        if let Some(val) = lookup("HFRELAY_SERVER_RETRY") {
            builder = builder.retry_in_handlers(parse_flag(&val));
        }
        if let Some(val) = lookup("HFRELAY_STORY_RAW_FALLBACK") {
            builder = builder.story_raw_fallback(parse_flag(&val));
        }

        builder.build()
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(RelayError::ConfigurationError(
                "base URL must not be empty".into(),
            ));
        }
        if self.upstream.timeout.is_zero() {
            return Err(RelayError::ConfigurationError(
                "timeout must be greater than zero".into(),
            ));
        }
        self.roster.validate()
    }
}

fn parse_flag(val: &str) -> bool {
    let v = val.trim().to_lowercase();
    !(v.is_empty() || v == "false" || v == "0" || v == "off" || v == "no")
}

/// Builder for `RelayConfig`
#[derive(Debug, Clone)]
pub struct RelayConfigBuilder {
    upstream: UpstreamConfig,
    roster: CandidateRoster,
    retry: RetryPolicy,
    story_raw_fallback: bool,
    server: ServerConfig,
}

impl Default for RelayConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayConfigBuilder {
    pub fn new() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            roster: CandidateRoster::default(),
            retry: RetryPolicy::default(),
            story_raw_fallback: true,
            server: ServerConfig::default(),
        }
    }

    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.upstream.base_url = url.into();
        self
    }
    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.upstream.api_key = Some(SecretString::from(key.into()));
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.upstream.timeout = timeout;
        self
    }
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.upstream.connect_timeout = timeout;
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.upstream.user_agent = user_agent.into();
        self
    }
    pub fn candidates(mut self, capability: Capability, list: CandidateList) -> Self {
        self.roster.set(capability, list);
        self
    }
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }
    pub fn story_raw_fallback(mut self, enabled: bool) -> Self {
        self.story_raw_fallback = enabled;
        self
    }
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.server.bind_addr = addr;
        self
    }
    pub fn max_upload_bytes(mut self, limit: usize) -> Self {
        self.server.max_upload_bytes = limit;
        self
    }
    pub fn retry_in_handlers(mut self, enabled: bool) -> Self {
        self.server.retry_in_handlers = enabled;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<RelayConfig, RelayError> {
        let config = RelayConfig {
            upstream: self.upstream,
            roster: self.roster,
            retry: self.retry,
            story_raw_fallback: self.story_raw_fallback,
            server: self.server,
        };
        config.validate()?;
        Ok(config)
    }
}
