use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = "fxconv/1.0";

/// Status code and raw body of a completed GET.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Issues a single GET against an API host.
///
/// Any status the server answers with is a successful fetch; only transport
/// failures (DNS, connect, timeout) are errors. There are no retries.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<FetchResponse>;
}

pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(HttpClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Joins a relative endpoint to the base URL; absolute URLs are used as is.
    fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
        let raw = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint)
        };
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        url.with_context(|| format!("Invalid URL: {raw}"))
    }
}

#[async_trait]
impl HttpFetcher for HttpClient {
    #[instrument(name = "HttpGet", skip(self, params))]
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<FetchResponse> {
        let url = self.url(endpoint, params)?;
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;
        debug!(status, bytes = body.len(), "Received response");

        Ok(FetchResponse { status, body })
    }
}
