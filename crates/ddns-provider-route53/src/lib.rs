// # Route 53 DNS Provider
//
// This crate provides the AWS Route 53 provider implementation for the DDNS
// updater.
//
// ## Behavior
//
// - One API call per trait method: `ListResourceRecordSets` or
//   `ChangeResourceRecordSets`
// - Changes are single-change `UPSERT` batches; propagation is not awaited
// - The SDK's retry policy is disabled, so every failure surfaces immediately
// - Credentials and region come from the default AWS provider chain
//
// ## Error Mapping
//
// - Dispatch failures and timeouts → `Error::Transport`
// - Service and response errors → `Error::Provider { provider: "route53", .. }`
//
// ## API Reference
//
// - List records: GET `/2013-04-01/hostedzone/{Id}/rrset?name=..&type=..&maxitems=..`
// - Change records: POST `/2013-04-01/hostedzone/{Id}/rrset/`

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_route53::Client;
use aws_sdk_route53::error::{DisplayErrorContext, SdkError};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ChangeInfo, ResourceRecord, ResourceRecordSet, RrType,
};
use ddns_core::traits::DnsProvider;
use ddns_core::{AddressRecord, ChangeStatus, Error, RecordType, Result};
use std::time::Duration;

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "route53";

/// Default timeout for a single Route 53 operation (30 seconds)
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Route 53 DNS provider
///
/// Holds one long-lived SDK client; cloning shares its connection pool.
#[derive(Debug, Clone)]
pub struct Route53Provider {
    /// Route 53 API client
    client: Client,
}

impl Route53Provider {
    /// Wrap an existing Route 53 client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a provider from the default AWS configuration chain
    ///
    /// Retries are disabled and each operation is bounded by a 30 second
    /// timeout.
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(DEFAULT_OPERATION_TIMEOUT)
                    .build(),
            )
            .load()
            .await;

        tracing::debug!(
            "Loaded AWS configuration (region: {:?})",
            sdk_config.region()
        );

        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_records(
        &self,
        zone_id: &str,
        start_name: &str,
        start_type: &RecordType,
        max_items: i32,
    ) -> Result<Vec<AddressRecord>> {
        tracing::debug!(
            "Listing Route 53 records in {} starting at {} ({})",
            zone_id,
            start_name,
            start_type
        );

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .start_record_name(start_name)
            .start_record_type(to_rr_type(start_type))
            .max_items(max_items)
            .send()
            .await
            .map_err(|e| classify_sdk_error("ListResourceRecordSets", e))?;

        Ok(output
            .resource_record_sets()
            .iter()
            .map(from_record_set)
            .collect())
    }

    async fn upsert_record(&self, zone_id: &str, record: &AddressRecord) -> Result<ChangeStatus> {
        tracing::info!(
            "Upserting Route 53 record {} ({}) -> {:?} in {}",
            record.name,
            record.record_type,
            record.values,
            zone_id
        );

        let batch = build_upsert_batch(record)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| classify_sdk_error("ChangeResourceRecordSets", e))?;

        let info = output.change_info().ok_or_else(|| {
            Error::provider(PROVIDER_NAME, "Invalid response format: missing ChangeInfo")
        })?;

        Ok(to_change_status(info))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Build a batch holding one UPSERT change for `record`
fn build_upsert_batch(record: &AddressRecord) -> Result<ChangeBatch> {
    let resource_records = record
        .values
        .iter()
        .map(|value| ResourceRecord::builder().value(value).build())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::invalid_input(format!("Invalid resource record: {}", e)))?;

    let record_set = ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(to_rr_type(&record.record_type))
        .set_ttl(record.ttl)
        .set_resource_records(Some(resource_records))
        .build()
        .map_err(|e| Error::invalid_input(format!("Invalid record set: {}", e)))?;

    let change = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(|e| Error::invalid_input(format!("Invalid change: {}", e)))?;

    ChangeBatch::builder()
        .changes(change)
        .build()
        .map_err(|e| Error::invalid_input(format!("Invalid change batch: {}", e)))
}

fn to_rr_type(record_type: &RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Other(name) => RrType::from(name.as_str()),
    }
}

fn from_record_set(set: &ResourceRecordSet) -> AddressRecord {
    AddressRecord {
        name: decode_record_name(set.name()),
        record_type: RecordType::from(set.r#type().as_str()),
        values: set
            .resource_records()
            .iter()
            .map(|rr| rr.value().to_string())
            .collect(),
        ttl: set.ttl(),
    }
}

fn to_change_status(info: &ChangeInfo) -> ChangeStatus {
    let submitted = info.submitted_at();

    ChangeStatus {
        id: info.id().to_string(),
        status: info.status().as_str().to_string(),
        comment: info.comment().map(str::to_string),
        submitted_at: chrono::DateTime::from_timestamp(submitted.secs(), submitted.subsec_nanos()),
    }
}

/// Decode Route 53's `\ddd` octal escapes in record names
///
/// Route 53 reports characters outside `a-z0-9-_.` escaped, e.g. the wildcard
/// `*.example.com.` comes back as `\052.example.com.`.
pub fn decode_record_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\'
            && let Some(digits) = bytes.get(i + 1..i + 4)
            && digits.iter().all(|d| (b'0'..=b'7').contains(d))
        {
            let value = digits
                .iter()
                .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            if let Ok(byte) = u8::try_from(value) {
                decoded.push(byte);
                i += 4;
                continue;
            }
        }

        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn classify_sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let transport = matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    );
    let detail = DisplayErrorContext(err).to_string();

    if transport {
        Error::transport(format!("Route 53 {} failed: {}", operation, detail))
    } else {
        Error::provider(PROVIDER_NAME, format!("{} failed: {}", operation, detail))
    }
}
