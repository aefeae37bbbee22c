//! Test doubles and common utilities for updater contract tests
//!
//! This module provides minimal test doubles that record how the updater
//! drives its collaborators without talking to any network.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource, PublicIp};
use ddns_core::{AddressRecord, ChangeStatus, DdnsConfig, RecordType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that always reports the same address
pub struct StaticIpSource {
    ip: String,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<PublicIp> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        PublicIp::from_response_body(&self.ip)
            .ok_or_else(|| Error::transport("IP service returned an empty response"))
    }

    fn source_url(&self) -> &str {
        "http://example.test/ip"
    }
}

/// An IpSource whose service is unreachable
pub struct UnreachableIpSource;

#[async_trait::async_trait]
impl IpSource for UnreachableIpSource {
    async fn current(&self) -> Result<PublicIp> {
        Err(Error::transport("connection refused"))
    }

    fn source_url(&self) -> &str {
        "http://unreachable.test/ip"
    }
}

/// One list_records() call as seen by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub zone_id: String,
    pub start_name: String,
    pub start_type: RecordType,
    pub max_items: i32,
}

/// A mock DnsProvider that serves a fixed page and tracks calls
///
/// Clones share counters, so a test can keep one handle while the updater
/// owns another.
#[derive(Clone)]
pub struct MockDnsProvider {
    /// Page returned from list_records()
    page: Arc<Mutex<Vec<AddressRecord>>>,
    /// Recorded list calls
    list_calls: Arc<Mutex<Vec<ListCall>>>,
    /// Recorded upserts as (zone, record)
    upserts: Arc<Mutex<Vec<(String, AddressRecord)>>>,
    /// Fail list_records() with a provider error
    fail_list: bool,
    /// Fail upsert_record() with a provider error
    fail_upsert: bool,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::with_page(Vec::new())
    }

    pub fn with_page(page: Vec<AddressRecord>) -> Self {
        Self {
            page: Arc::new(Mutex::new(page)),
            list_calls: Arc::new(Mutex::new(Vec::new())),
            upserts: Arc::new(Mutex::new(Vec::new())),
            fail_list: false,
            fail_upsert: false,
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_upsert(mut self) -> Self {
        self.fail_upsert = true;
        self
    }

    /// Get the recorded list calls
    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Get the number of times upsert_record() was called
    pub fn upsert_call_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    /// Get the recorded upserts
    pub fn upserts(&self) -> Vec<(String, AddressRecord)> {
        self.upserts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(
        &self,
        zone_id: &str,
        start_name: &str,
        start_type: &RecordType,
        max_items: i32,
    ) -> Result<Vec<AddressRecord>> {
        self.list_calls.lock().unwrap().push(ListCall {
            zone_id: zone_id.to_string(),
            start_name: start_name.to_string(),
            start_type: start_type.clone(),
            max_items,
        });

        if self.fail_list {
            return Err(Error::provider("mock", "NoSuchHostedZone"));
        }

        Ok(self.page.lock().unwrap().clone())
    }

    async fn upsert_record(&self, zone_id: &str, record: &AddressRecord) -> Result<ChangeStatus> {
        if self.fail_upsert {
            return Err(Error::provider("mock", "PriorRequestNotComplete"));
        }

        let mut upserts = self.upserts.lock().unwrap();
        upserts.push((zone_id.to_string(), record.clone()));

        Ok(ChangeStatus {
            id: format!("/change/C{}", upserts.len()),
            status: "PENDING".to_string(),
            comment: None,
            submitted_at: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config() -> DdnsConfig {
    DdnsConfig::new("http://example.test/ip", "Z123")
}

/// An existing A record as the provider would report it
pub fn existing_a(name: &str, ip: &str) -> AddressRecord {
    AddressRecord::a(format!("{}.", name), ip, 1200)
}
