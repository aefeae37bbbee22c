//! DNS record model
//!
//! Records are owned by the DNS provider; these types only describe what was
//! read from it or what is about to be written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Maximum length of a DNS name in presentation format (RFC 1035)
const MAX_NAME_LEN: usize = 253;

/// DNS record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// Address record (IPv4)
    A,
    /// Any other type reported by the provider
    Other(String),
}

impl RecordType {
    /// Wire name of the type
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Other(name) => name,
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("A") {
            RecordType::A
        } else {
            RecordType::Other(value.to_ascii_uppercase())
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record set as seen by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Record name, as the provider reports it
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Record values
    pub values: Vec<String>,
    /// Time-to-live in seconds, if the provider reported one
    pub ttl: Option<i64>,
}

impl AddressRecord {
    /// Build a single-value address record
    pub fn a(name: impl Into<String>, value: impl Into<String>, ttl: i64) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::A,
            values: vec![value.into()],
            ttl: Some(ttl),
        }
    }

    /// Whether this record is the address record for `name`
    pub fn is_address_record_for(&self, name: &str) -> bool {
        self.record_type == RecordType::A && names_match(&self.name, name)
    }
}

/// Tracking information for a submitted change batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStatus {
    /// Provider change id
    pub id: String,
    /// Provider status, e.g. `PENDING` or `INSYNC`
    pub status: String,
    /// Comment attached to the change, if any
    pub comment: Option<String>,
    /// When the provider accepted the change
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Normalize a record name for comparison
///
/// Providers report fully-qualified names with a trailing dot and may differ
/// in case from what the caller asked for.
pub fn normalize_record_name(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}

/// Compare two record names after normalization
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_record_name(a) == normalize_record_name(b)
}

/// Reject names that cannot be DNS names before any network call
pub fn validate_record_name(name: &str) -> Result<()> {
    let normalized = name.strip_suffix('.').unwrap_or(name);

    if normalized.trim().is_empty() {
        return Err(Error::invalid_input("Record name cannot be empty"));
    }

    if normalized.len() > MAX_NAME_LEN {
        return Err(Error::invalid_input(format!(
            "Record name too long: {} chars (max {})",
            normalized.len(),
            MAX_NAME_LEN
        )));
    }

    if normalized.split('.').any(str::is_empty) {
        return Err(Error::invalid_input(format!(
            "Record name has empty label: '{}'",
            name
        )));
    }

    Ok(())
}
