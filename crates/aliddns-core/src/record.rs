//! Data model shared across the workspace.
//!
//! The wire shapes (`DomainRecord`, `RecordSet`) mirror the alidns
//! `DescribeDomainRecords` response; everything else is internal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// IP family handled independently by a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// The DNS record type this family maps to
    pub fn record_type(self) -> RecordType {
        match self {
            IpFamily::V4 => RecordType::A,
            IpFamily::V6 => RecordType::Aaaa,
        }
    }

    /// Whether `ip` belongs to this family
    pub fn matches(self, ip: IpAddr) -> bool {
        match self {
            IpFamily::V4 => ip.is_ipv4(),
            IpFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "IPv4"),
            IpFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// DNS record kind managed by the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire representation used by the provider API
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DNS record as held by the provider
///
/// Owned by the provider; the reconciler reads these fresh every pass and
/// never caches them across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Host label left of the domain ("@", "*", "www", ...)
    #[serde(rename = "RR")]
    pub rr: String,

    /// Opaque provider-assigned identifier
    #[serde(rename = "RecordId")]
    pub record_id: String,

    /// Record type (A or AAAA)
    #[serde(rename = "Type")]
    pub record_type: RecordType,

    /// Current record value as stored at the provider
    #[serde(rename = "Value")]
    pub value: String,
}

/// Result of a describe call: all records of one type for a domain
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Total number of records the provider reported
    pub total_count: u64,
    /// The records themselves
    pub records: Vec<DomainRecord>,
}

/// A mutation performed during a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    /// A record was created
    Added {
        /// Host label
        rr: String,
        /// Address written
        value: IpAddr,
    },
    /// A stale record was rewritten
    Updated {
        /// Host label
        rr: String,
        /// Value the record held before the update
        previous: String,
        /// Address written
        value: IpAddr,
    },
}

/// Addresses discovered for one family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Discovery {
    /// Public address an external service observed, if any
    pub public: Option<IpAddr>,
    /// Address the local interface would source traffic from, if any
    pub local: Option<IpAddr>,
}

impl Discovery {
    /// The public address, but only when the local interface owns it.
    ///
    /// Behind NAT/CGNAT the public address belongs to someone else's
    /// equipment; publishing it to DNS would be wrong, so both sides must
    /// be present and equal.
    pub fn confirmed(&self) -> Option<IpAddr> {
        match (self.public, self.local) {
            (Some(public), Some(local)) if public == local => Some(public),
            _ => None,
        }
    }
}
