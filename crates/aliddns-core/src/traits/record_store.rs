//! DNS provider record-store trait.
//!
//! Defines the three logical operations the reconciler needs from any DNS
//! provider: describe the records of a domain, add a record, update a
//! record. One concrete implementation per provider is sufficient; the
//! reconciler only talks to the trait object.
//!
//! # Trust rules for implementations
//!
//! Implementations are stateless single-shot API adapters:
//! - one provider call per method invocation, no retries or backoff
//! - no caching of records between calls (the reconciler re-reads every pass)
//! - failures surface as [`crate::Error`], never as provider-specific types

use async_trait::async_trait;
use std::net::IpAddr;

use crate::record::{RecordSet, RecordType};

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch all records of one type for a domain
    ///
    /// Returns the provider's total count alongside the records so the
    /// caller can distinguish "no records" from a truncated page.
    async fn describe(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<RecordSet, crate::Error>;

    /// Create a record
    ///
    /// # Parameters
    ///
    /// - `rr`: host label ("@", "*", "www", ...)
    /// - `domain`: the domain name
    /// - `record_type`: A or AAAA
    /// - `value`: address to publish
    async fn add(
        &self,
        rr: &str,
        domain: &str,
        record_type: RecordType,
        value: IpAddr,
    ) -> Result<(), crate::Error>;

    /// Rewrite an existing record identified by its provider-assigned ID
    async fn update(
        &self,
        rr: &str,
        record_id: &str,
        record_type: RecordType,
        value: IpAddr,
    ) -> Result<(), crate::Error>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}
