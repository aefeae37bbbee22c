// # ddns-core
//
// Core library for the on-demand DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for discovering the caller's public IP
// - **DnsProvider**: Trait for listing and upserting records via provider APIs
// - **DdnsUpdater**: Orchestrates IP lookup → record lookup → conditional upsert
// - **DdnsConfig**: Immutable configuration resolved once at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Library-First**: All core functionality can be used as a library
// 3. **Explicit Failures**: Every failure is a typed error; nothing is retried
// 4. **No Auto-Healing**: Names with more than one address record are rejected

pub mod traits;
pub mod updater;
pub mod record;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, PublicIp};
pub use updater::{DdnsUpdater, UpdateAction, UpdateOutcome};
pub use record::{AddressRecord, ChangeStatus, RecordType};
pub use config::{DdnsConfig, Properties};
pub use error::{Error, Result};
