// # IP Source Trait
//
// Defines the interface for discovering the caller's public IP address.
//
// ## Implementations
//
// - HTTP "what is my IP" service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let ip = source.current().await?;
//     println!("public IP: {}", ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public IP address as reported by the discovery service
///
/// The value is the first line of the service response, taken verbatim.
/// It is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicIp(String);

impl PublicIp {
    /// Extract the address from a discovery service response body
    ///
    /// Returns `None` if the body has no non-empty first line.
    pub fn from_response_body(body: &str) -> Option<Self> {
        let first_line = body.lines().next()?.trim_end();
        if first_line.trim().is_empty() {
            return None;
        }
        Some(Self(first_line.to_string()))
    }

    /// The address as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for IP source implementations
///
/// One call performs one lookup: no retries and no caching. Failures are
/// returned as errors, never as an empty address.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(PublicIp)`: The address reported by the service
    /// - `Err(Error::Transport)`: If the service could not be reached or
    ///   returned nothing usable
    async fn current(&self) -> Result<PublicIp, crate::Error>;

    /// URL of the discovery service (for logging)
    fn source_url(&self) -> &str;
}
