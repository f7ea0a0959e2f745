//! HTTP client with retry logic and user-agent rotation
//!
//! General fetches retry transient failures with exponential backoff.
//! Validation probes and per-page scrapes go out exactly once: they are
//! cheap to lose and there are many of them.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, ScoutError};

/// Desktop browser user agents rotated across attempts
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
];

/// Pick a user agent for the next attempt
pub fn random_user_agent() -> &'static str {
    USER_AGENTS[fastrand::usize(..USER_AGENTS.len())]
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds for general fetches (default: 20)
    pub timeout_secs: u64,
    /// Request timeout in seconds for validation probes (default: 8)
    pub probe_timeout_secs: u64,
    /// Maximum retry attempts for transient errors (default: 3)
    pub max_retries: u32,
    /// First backoff delay in milliseconds, doubled per attempt (default: 1000)
    pub backoff_base_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            probe_timeout_secs: 8,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

/// Status and body of a single validation probe
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP client wrapper shared by every stage of the pipeline
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted, so
/// validation tasks each hold their own handle.
#[derive(Clone)]
pub struct ScoutClient {
    client: reqwest::Client,
    max_retries: u32,
    backoff_base: Duration,
    probe_timeout: Duration,
}

impl ScoutClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("tr-TR,tr;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(ScoutError::HttpError)?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        })
    }

    /// Fetch a URL as text, retrying transient failures
    ///
    /// # Errors
    /// - `HttpError` - Network errors once retries are exhausted
    /// - `Status` - Non-success status (5xx only after retries)
    /// - `RateLimited` - Server kept returning 429
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            match self.do_fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff = self.backoff_for(attempt);
                    debug!(url, attempt, error = %e, "retrying after {:?}", backoff);
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Fetch a URL with retries and decode the body as JSON
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a URL as text with a single attempt
    pub async fn fetch_once(&self, url: &str) -> Result<String> {
        self.do_fetch(url).await
    }

    /// Issue one validation probe
    ///
    /// Any answered request is `Ok`, whatever its status; only transport
    /// failures are errors. Uses the shorter probe timeout. A `HEAD` probe
    /// comes back with an empty body.
    pub async fn probe(&self, method: Method, url: &str) -> Result<ProbeResponse> {
        let response = self
            .client
            .request(method, url)
            .header(USER_AGENT, random_user_agent())
            .timeout(self.probe_timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(ProbeResponse { status, body })
    }

    /// Backoff before retry number `attempt + 1`: base, 2x base, 4x base...
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(1u32 << attempt.min(16))
    }

    /// Perform a single fetch attempt
    async fn do_fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScoutError::RateLimited);
        }

        if !status.is_success() {
            return Err(ScoutError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(ScoutError::HttpError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_client() -> ScoutClient {
        ScoutClient::with_config(&ClientConfig {
            timeout_secs: 5,
            probe_timeout_secs: 2,
            max_retries: 2,
            backoff_base_ms: 10,
        })
        .unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.probe_timeout_secs, 8);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_base_ms, 1000);
    }

    #[test]
    fn test_client_creation() {
        assert!(ScoutClient::new().is_ok());
    }

    #[test]
    fn test_backoff_doubles() {
        let client = ScoutClient::new().unwrap();
        assert_eq!(client.backoff_for(0), Duration::from_secs(1));
        assert_eq!(client.backoff_for(1), Duration::from_secs(2));
        assert_eq!(client.backoff_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_random_user_agent_from_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[tokio::test]
    async fn test_fetch_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let body = fast_client()
            .fetch(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_fetch_does_not_retry_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let result = fast_client()
            .fetch(&format!("{}/missing", server.uri()))
            .await;
        assert!(matches!(result, Err(ScoutError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_once_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = fast_client()
            .fetch_once(&format!("{}/page", server.uri()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"["a","b"]"#))
            .mount(&server)
            .await;

        let values: Vec<String> = fast_client()
            .fetch_json(&format!("{}/list", server.uri()))
            .await
            .unwrap();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_probe_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410).set_body_string("gone"))
            .mount(&server)
            .await;

        let probe = fast_client()
            .probe(Method::GET, &format!("{}/gone", server.uri()))
            .await
            .unwrap();
        assert_eq!(probe.status, 410);
        assert_eq!(probe.body, "gone");
    }

    #[tokio::test]
    async fn test_head_request_has_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/part"))
            .respond_with(ResponseTemplate::new(206))
            .expect(1)
            .mount(&server)
            .await;

        let probe = fast_client()
            .probe(Method::HEAD, &format!("{}/part", server.uri()))
            .await
            .unwrap();
        assert_eq!(probe.status, 206);
        assert!(probe.body.is_empty());
    }
}
