//! Network layer: request engine, response cache, and transport.
//!
//! This module provides the request infrastructure for Yomu:
//!
//! - **Transport**: the [`Transport`] trait performs one GET and reports the
//!   raw status and body; [`ReqwestTransport`] is the real implementation
//! - **Caching**: every client owns a [`ResponseCache`] keyed by endpoint
//! - **Throttling**: a fixed pause before every upstream request attempt
//! - **Retry Logic**: linear backoff on 429, nothing else is retried
//! - **JSON helpers**: [`json`] path extraction for native payloads
//!
//! # Examples
//!
//! ```rust,no_run
//! use yomu::config::ClientConfig;
//! use yomu::net::HttpClient;
//!
//! # async fn example() -> yomu::Result<()> {
//! let client = HttpClient::new(ClientConfig::default())?;
//!
//! // First call hits the network, the second is served from cache.
//! let genres = client.get_value("/genres/manga").await?;
//! let again = client.get_value("/genres/manga").await?;
//! assert!(std::sync::Arc::ptr_eq(&genres, &again));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, warn};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ClientConfig, USER_AGENT};
use crate::error::{Error, Result};

pub mod cache;
pub mod json;

pub use cache::ResponseCache;

/// Shared HTTP client used when the default configuration is in effect.
///
/// Configured with a 30-second timeout, connection pooling, compression, and
/// the crate's User-Agent. Built lazily on first use.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
        .expect("Failed to build HTTP client")
});

/// Status and body of one upstream response, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs a single GET. No retries, no caching, no status interpretation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse>;
}

/// [`Transport`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Uses the lazily-built shared client.
    pub fn shared() -> Self {
        Self {
            client: CLIENT.clone(),
        }
    }

    /// Builds a dedicated client honoring the config's timeout and user agent.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(10)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}

/// Request engine: cache lookup, throttle, 429 backoff, JSON parsing.
///
/// # Behavior
///
/// 1. A cached payload younger than the TTL is returned as-is.
/// 2. Otherwise every attempt first sleeps `request_delay`.
/// 3. A 429 is retried up to `max_retries` times, retry `n` waiting
///    `backoff_step * n` on top of the throttle. A 429 after that is
///    [`Error::RateLimited`].
/// 4. Any other non-2xx is [`Error::Upstream`].
/// 5. A 2xx body is parsed, cached under the endpoint, and returned.
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a client with its own reqwest transport.
    ///
    /// The shared client is reused when timeout and user agent are the
    /// defaults.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let defaults = ClientConfig::default();
        let transport = if config.timeout == defaults.timeout
            && config.user_agent == defaults.user_agent
        {
            ReqwestTransport::shared()
        } else {
            ReqwestTransport::from_config(&config)?
        };
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client over any [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(config.cache_ttl),
            config,
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The response cache owned by this client.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetches `endpoint` (path plus already-encoded query) as JSON.
    ///
    /// # Errors
    ///
    /// * [`Error::RateLimited`] - 429 on the initial attempt and every retry
    /// * [`Error::Upstream`] - any other non-success status
    /// * [`Error::Transport`] - the request failed before a response
    /// * [`Error::Json`] - the body is not JSON
    pub async fn get_value(&self, endpoint: &str) -> Result<Arc<Value>> {
        if let Some(cached) = self.cache.get(endpoint) {
            debug!("cache hit for {}", endpoint);
            return Ok(cached);
        }

        let url = self.config.url_for(endpoint);
        let mut attempts = 0;

        loop {
            self.throttle().await;
            debug!("GET {}", url);

            let response = self.transport.get(&url).await?;

            match response.status {
                200..=299 => {
                    let payload: Value = serde_json::from_slice(&response.body)?;
                    let payload = Arc::new(payload);
                    self.cache.insert(endpoint, Arc::clone(&payload));
                    return Ok(payload);
                }
                429 if attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.config.backoff_step * attempts;
                    warn!(
                        "rate limited on {}, retry {}/{} in {:?}",
                        endpoint, attempts, self.config.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                429 => return Err(Error::RateLimited),
                status => return Err(Error::Upstream { status }),
            }
        }
    }

    /// Fetches `endpoint` and deserializes it into `T`.
    pub async fn get_json<T>(&self, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let payload = self.get_value(endpoint).await?;
        T::deserialize(&*payload).map_err(Into::into)
    }

    async fn throttle(&self) {
        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Replays canned statuses; every 2xx answers with `body`.
    struct Scripted {
        statuses: Mutex<VecDeque<u16>>,
        body: &'static str,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(statuses: &[u16], body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                body,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn get(&self, _url: &str) -> Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let status = self.statuses.lock().pop_front().unwrap_or(200);
            Ok(RawResponse::new(status, self.body))
        }
    }

    fn client(transport: Arc<Scripted>) -> HttpClient {
        HttpClient::with_transport(ClientConfig::default(), transport)
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttles_every_request() {
        let transport = Scripted::new(&[200], r#"{"data": []}"#);
        let client = client(transport.clone());

        let start = Instant::now();
        client.get_value("/genres/manga").await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_rate_limits_then_success() {
        let transport = Scripted::new(&[429, 429, 429, 200], r#"{"data": []}"#);
        let client = client(transport.clone());

        let start = Instant::now();
        let payload = client.get_value("/manga?page=1&limit=20").await.unwrap();

        assert_eq!(payload["data"], serde_json::json!([]));
        assert_eq!(transport.calls(), 4);
        // 4 throttles + 2s + 4s + 6s of backoff.
        assert_eq!(start.elapsed(), Duration::from_secs(4 + 2 + 4 + 6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_rate_limits_fail() {
        let transport = Scripted::new(&[429, 429, 429, 429, 200], "{}");
        let client = client(transport.clone());

        let err = client.get_value("/manga?page=1&limit=20").await.unwrap_err();
        assert!(matches!(err, Error::RateLimited));
        assert_eq!(transport.calls(), 4);
        assert!(client.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_statuses_are_not_retried() {
        let transport = Scripted::new(&[503, 200], "{}");
        let client = client(transport.clone());

        let err = client.get_value("/manga/1/full").await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 503 }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_serves_same_payload_until_ttl() {
        let transport = Scripted::new(&[], r#"{"data": [1, 2, 3]}"#);
        let client = client(transport.clone());

        let first = client.get_value("/manga?page=1&limit=20").await.unwrap();
        let second = client.get_value("/manga?page=1&limit=20").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.calls(), 1);

        tokio::time::advance(Duration::from_secs(5 * 60)).await;
        let third = client.get_value("/manga?page=1&limit=20").await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_json_is_not_cached() {
        let transport = Scripted::new(&[], "<html>maintenance</html>");
        let client = client(transport.clone());

        let err = client.get_value("/genres/manga").await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(client.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_json_deserializes() {
        #[derive(serde::Deserialize)]
        struct Envelope {
            data: Vec<u32>,
        }

        let transport = Scripted::new(&[], r#"{"data": [4, 5]}"#);
        let client = client(transport);
        let envelope: Envelope = client.get_json("/x").await.unwrap();
        assert_eq!(envelope.data, vec![4, 5]);
    }
}
