// # DNS Provider Trait
//
// Defines the interface for reading and writing records through a managed
// DNS provider's record-management API.
//
// ## Implementations
//
// - Route 53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{AddressRecord, DnsProvider, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let page = provider
//         .list_records("Z123", "foo.example.com", &RecordType::A, 1)
//         .await?;
//
//     let record = AddressRecord::a("foo.example.com", "203.0.113.7", 1200);
//     let change = provider.upsert_record("Z123", &record).await?;
//     println!("change {} is {}", change.id, change.status);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{AddressRecord, ChangeStatus, RecordType};

/// Trait for DNS provider implementations
///
/// Providers are thin API adapters:
/// - One API call per method invocation
/// - No retry logic and no caching
/// - No decisions about whether a write is safe (owned by `DdnsUpdater`)
///
/// Implementations must be thread-safe; a single instance is shared by all
/// concurrent requests.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List records starting at a name
    ///
    /// Returns the provider's page verbatim. The provider lists records in
    /// zone order *starting at* `start_name`, so the page may contain names
    /// other than `start_name`; filtering is the caller's job.
    ///
    /// # Parameters
    ///
    /// - `zone_id`: Hosted zone to list
    /// - `start_name`: First record name to list
    /// - `start_type`: First record type to list at `start_name`
    /// - `max_items`: Page size
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<AddressRecord>)`: The page (empty if the provider reports none)
    /// - `Err(Error)`: If the request failed or was rejected
    async fn list_records(
        &self,
        zone_id: &str,
        start_name: &str,
        start_type: &RecordType,
        max_items: i32,
    ) -> Result<Vec<AddressRecord>, crate::Error>;

    /// Create or replace a record set in a single change batch
    ///
    /// Does not wait for the change to propagate.
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeStatus)`: Provider tracking information for the change
    /// - `Err(Error)`: If the batch was rejected or the provider unreachable
    async fn upsert_record(
        &self,
        zone_id: &str,
        record: &AddressRecord,
    ) -> Result<ChangeStatus, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
