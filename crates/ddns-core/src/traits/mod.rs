//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the caller's public IP address
//! - [`DnsProvider`]: Read and upsert records via provider APIs

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, PublicIp};
pub use dns_provider::DnsProvider;
