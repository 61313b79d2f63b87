//! Client configuration.
//!
//! [`ClientConfig`] holds every knob of the request engine and the synthetic
//! data generator. The defaults match what the public Jikan API tolerates:
//! one request per second, a five minute response cache, and three linear
//! backoff retries on 429.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use yomu::config::{ClientConfigBuilder, SynthMode};
//!
//! let config = ClientConfigBuilder::default()
//!     .request_delay(Duration::from_millis(250))
//!     .synth_mode(SynthMode::Random)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_retries, 3);
//! assert_eq!(config.cache_ttl, Duration::from_secs(300));
//! ```

use derive_builder::Builder;
use std::time::Duration;

/// Base URL of the Jikan v4 API.
pub const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Default `User-Agent` header.
pub const USER_AGENT: &str = concat!("yomu/", env!("CARGO_PKG_VERSION"));

/// How synthetic chapters and pages pick their random numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthMode {
    /// Seeded from a stable hash of the series or chapter id, so repeated
    /// fetches of the same id agree.
    #[default]
    Seeded,
    /// Fresh randomness on every fetch.
    Random,
}

/// Settings for a catalog client.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ClientConfig {
    /// Upstream base URL, without a trailing slash.
    #[builder(default = "JIKAN_BASE_URL.to_string()")]
    pub base_url: String,

    /// How long a cached response is served without a network call.
    #[builder(default = "Duration::from_secs(5 * 60)")]
    pub cache_ttl: Duration,

    /// Fixed pause before every upstream request attempt.
    #[builder(default = "Duration::from_secs(1)")]
    pub request_delay: Duration,

    /// Backoff unit on 429; retry `n` waits `backoff_step * n`.
    #[builder(default = "Duration::from_secs(2)")]
    pub backoff_step: Duration,

    /// Retries after a 429 before giving up.
    #[builder(default = "3")]
    pub max_retries: u32,

    /// Transport timeout for a single request.
    #[builder(default = "Duration::from_secs(30)")]
    pub timeout: Duration,

    #[builder(default = "USER_AGENT.to_string()")]
    pub user_agent: String,

    #[builder(default)]
    pub synth_mode: SynthMode,
}

impl ClientConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(base) = &self.base_url {
            let parsed = url::Url::parse(base)
                .map_err(|e| format!("invalid base_url {}: {}", base, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(format!("base_url must be http(s), got {}", parsed.scheme()));
            }
        }
        Ok(())
    }
}

impl ClientConfig {
    /// Builds the full URL for a relative endpoint.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: JIKAN_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(5 * 60),
            request_delay: Duration::from_secs(1),
            backoff_step: Duration::from_secs(2),
            max_retries: 3,
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
            synth_mode: SynthMode::Seeded,
        }
    }
}

impl From<ClientConfigBuilderError> for crate::Error {
    fn from(err: ClientConfigBuilderError) -> Self {
        crate::Error::config(err.to_string())
    }
}
