// # HTTP IP Source
//
// This crate provides the HTTP-based IP source for the DDNS updater.
//
// ## Behavior
//
// Each call performs a single GET against a "what is my IP" service (by
// default `http://checkip.amazonaws.com/`) and returns the first line of the
// response body verbatim. The address format is not validated; the service's
// output is trusted as-is.
//
// Failures are never turned into an empty address: an unreachable service, a
// non-success status, an unreadable body or an empty first line all produce
// `Error::Transport`. There are no retries and no caching.

use ddns_core::traits::{IpSource, PublicIp};
use ddns_core::{Error, Result};

use std::time::Duration;

/// Default request timeout for the IP service
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source with the default timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "http://checkip.amazonaws.com/")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();

        reqwest::Url::parse(&url)
            .map_err(|e| Error::config(format!("Malformed IP service URL '{}': {}", url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<PublicIp> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("IP service request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "IP service returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read IP service response: {}", e)))?;

        PublicIp::from_response_body(&body)
            .ok_or_else(|| Error::transport("IP service returned an empty response"))
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<PublicIp> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let ip = self.fetch_ip().await;
        if let Err(ref e) = ip {
            tracing::warn!("Public IP lookup via {} failed: {}", self.url, e);
        }
        ip
    }

    fn source_url(&self) -> &str {
        &self.url
    }
}
