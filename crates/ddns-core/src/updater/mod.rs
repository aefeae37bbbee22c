//! On-demand DDNS updater
//!
//! The DdnsUpdater is responsible for:
//! - Resolving the caller's public IP via IpSource
//! - Listing the address records that match a name via DnsProvider
//! - Upserting the address record when doing so is safe
//!
//! ## Request Flow
//!
//! ```text
//! START ──► IP_RESOLVED ──► RECORDS_CHECKED ──┬──► UPDATED   (count <= 1)
//!                                             └──► REJECTED  (count > 1)
//! ```
//!
//! Any step that fails short-circuits the rest. Nothing is retried, and a
//! rejected name is never repaired automatically.

use std::fmt;
use std::sync::Arc;

use crate::config::{DdnsConfig, LIST_PAGE_SIZE, RECORD_TTL_SECS};
use crate::error::Result;
use crate::record::{AddressRecord, ChangeStatus, RecordType, validate_record_name};
use crate::traits::{DnsProvider, IpSource, PublicIp};
use tracing::{debug, info, warn};

/// What the updater did with a record name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// The address record was submitted as an UPSERT
    Upserted(ChangeStatus),

    /// More than one matching record exists; nothing was written
    Rejected,
}

/// Result of one update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The resolved public IP
    pub ip: PublicIp,
    /// Number of address records that matched the name
    pub record_count: usize,
    /// Action taken
    pub action: UpdateAction,
}

impl UpdateOutcome {
    /// Whether the record was written
    pub fn is_upserted(&self) -> bool {
        matches!(self.action, UpdateAction::Upserted(_))
    }

    /// Response body reported to the caller
    pub fn summary(&self) -> String {
        format!("myIP: {} recordCount: {}", self.ip, self.record_count)
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Core DDNS updater
///
/// Built once at startup and shared across requests. Cloning is cheap; all
/// clones share the same IP source and provider client.
///
/// Concurrent updates of the *same* name are not coordinated: the provider
/// applies whichever UPSERT arrives last.
#[derive(Clone)]
pub struct DdnsUpdater {
    /// IP source for the public address
    ip_source: Arc<dyn IpSource>,

    /// DNS provider holding the zone
    provider: Arc<dyn DnsProvider>,

    /// Hosted zone holding the managed records
    zone_id: String,
}

impl fmt::Debug for DdnsUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdnsUpdater")
            .field("ip_source", &self.ip_source.source_url())
            .field("provider", &self.provider.provider_name())
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

impl DdnsUpdater {
    /// Create a new updater
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Resolved configuration (only the hosted zone is used here;
    ///   the IP source already carries its URL)
    pub fn new(
        ip_source: Arc<dyn IpSource>,
        provider: Arc<dyn DnsProvider>,
        config: &DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            zone_id: config.hosted_zone.clone(),
        })
    }

    /// Hosted zone this updater writes to
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// List the address records whose name is exactly `record_name`
    ///
    /// The provider lists records starting at a name, so its page can hold the
    /// next name in the zone or a different type; those are dropped here.
    pub async fn list_matching_records(&self, record_name: &str) -> Result<Vec<AddressRecord>> {
        let page = self
            .provider
            .list_records(&self.zone_id, record_name, &RecordType::A, LIST_PAGE_SIZE)
            .await?;

        let listed = page.len();
        let matching: Vec<AddressRecord> = page
            .into_iter()
            .filter(|record| record.is_address_record_for(record_name))
            .collect();

        debug!(
            "Listed {} record(s) starting at {}, {} matching",
            listed,
            record_name,
            matching.len()
        );

        Ok(matching)
    }

    /// Upsert the address record for `record_name`
    ///
    /// The change is submitted as a single-change batch with a TTL of
    /// [`RECORD_TTL_SECS`]. Propagation is not awaited.
    pub async fn upsert_address_record(
        &self,
        record_name: &str,
        ip: &PublicIp,
    ) -> Result<ChangeStatus> {
        let record = AddressRecord::a(record_name, ip.as_str(), RECORD_TTL_SECS);
        let change = self.provider.upsert_record(&self.zone_id, &record).await?;

        info!("Change Info Status: {}", change.status);
        info!(
            "Change Info Comment: {}",
            change.comment.as_deref().unwrap_or("<none>")
        );

        Ok(change)
    }

    /// Run the full update flow for one record name
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateOutcome)`: With [`UpdateAction::Upserted`] when zero or one
    ///   record matched, [`UpdateAction::Rejected`] when more did
    /// - `Err(Error)`: If the name is invalid, the IP lookup failed, or the
    ///   provider failed; nothing after the failing step runs
    pub async fn update(&self, record_name: &str) -> Result<UpdateOutcome> {
        validate_record_name(record_name)?;

        let ip = self.ip_source.current().await?;
        info!("Resolved public IP {} via {}", ip, self.ip_source.source_url());

        let record_count = self.list_matching_records(record_name).await?.len();

        if record_count <= 1 {
            let change = self.upsert_address_record(record_name, &ip).await?;
            info!(
                "Upserted {} -> {} (matching records: {}, change: {})",
                record_name, ip, record_count, change.id
            );

            Ok(UpdateOutcome {
                ip,
                record_count,
                action: UpdateAction::Upserted(change),
            })
        } else {
            warn!(
                "Refusing to update {}: {} matching address records, expected at most one",
                record_name, record_count
            );

            Ok(UpdateOutcome {
                ip,
                record_count,
                action: UpdateAction::Rejected,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_response_format() {
        let outcome = UpdateOutcome {
            ip: PublicIp::from_response_body("203.0.113.7").unwrap(),
            record_count: 2,
            action: UpdateAction::Rejected,
        };

        assert_eq!(outcome.summary(), "myIP: 203.0.113.7 recordCount: 2");
        assert_eq!(outcome.to_string(), outcome.summary());
        assert!(!outcome.is_upserted());
    }
}
