//! Configuration types for the aliddns workspace.
//!
//! The original tool kept API hostnames, record labels and timeouts as
//! module-level constants; here they are explicit structures handed to the
//! reconciler and resolver at construction time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::record::IpFamily;

/// Region used when none is given on the command line
pub const DEFAULT_REGION_ID: &str = "cn-hangzhou";

/// Labels synchronized when none are given on the command line
pub const DEFAULT_LABELS: &[&str] = &["@", "*"];

/// Bound on every discovery network operation, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Port the local-address probe connects toward (never transmits)
pub const DEFAULT_PROBE_PORT: u16 = 443;

/// Alibaba Cloud credential triple
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// AccessKey ID
    pub access_key_id: String,
    /// AccessKey secret
    pub access_key_secret: String,
    /// Region ID, e.g. "cn-hangzhou"
    pub region_id: String,
}

impl Credentials {
    /// Create credentials for the default region
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            region_id: DEFAULT_REGION_ID.to_string(),
        }
    }

    /// Override the region
    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = region_id.into();
        self
    }

    /// Validate the credential triple
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.access_key_id.is_empty() {
            return Err(crate::Error::config("access key ID cannot be empty"));
        }
        if self.access_key_secret.is_empty() {
            return Err(crate::Error::config("access key secret cannot be empty"));
        }
        if self.region_id.is_empty() {
            return Err(crate::Error::config("region ID cannot be empty"));
        }
        Ok(())
    }
}

// The secret never appears in logs or debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<REDACTED>")
            .field("region_id", &self.region_id)
            .finish()
    }
}

/// Where to learn the public address for one family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyEndpoint {
    /// HTTP(S) URL returning the caller's IP as a plain-text body
    pub url: String,
    /// Host the local-address probe connects toward
    pub probe_host: String,
}

impl FamilyEndpoint {
    fn new(host: &str) -> Self {
        Self {
            url: format!("https://{host}/ip"),
            probe_host: host.to_string(),
        }
    }
}

/// Discovery settings for both families
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// IPv4 lookup endpoint
    pub ipv4: FamilyEndpoint,
    /// IPv6 lookup endpoint
    pub ipv6: FamilyEndpoint,
    /// Port for the local-address probe
    pub probe_port: u16,
    /// Bound on every discovery network operation, in seconds
    pub timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ipv4: FamilyEndpoint::new("api-ipv4.ip.sb"),
            ipv6: FamilyEndpoint::new("api-ipv6.ip.sb"),
            probe_port: DEFAULT_PROBE_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DiscoveryConfig {
    /// Endpoint for one family
    pub fn endpoint(&self, family: IpFamily) -> &FamilyEndpoint {
        match family {
            IpFamily::V4 => &self.ipv4,
            IpFamily::V6 => &self.ipv6,
        }
    }

    /// Discovery timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the discovery settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.ipv4.url.is_empty() || self.ipv6.url.is_empty() {
            return Err(crate::Error::config("lookup endpoint URL cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("discovery timeout must be > 0"));
        }
        Ok(())
    }
}

/// The domain plus the record labels to keep synchronized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileTarget {
    /// Domain name the records belong to
    pub domain: String,
    /// Host labels to synchronize ("@", "*", "www", ...)
    pub labels: Vec<String>,
}

impl ReconcileTarget {
    /// Target the default labels (`@` and `*`) of a domain
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override the label set
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Validate the target
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("domain name cannot be empty"));
        }
        // RFC 1035 upper bound; labels like "@" and "*" are DNS-special and
        // accepted as-is.
        if self.domain.len() > 253 {
            return Err(crate::Error::config(format!(
                "domain name too long: {} chars (max 253)",
                self.domain.len()
            )));
        }
        if self.labels.is_empty() {
            return Err(crate::Error::config(
                "at least one resource record label is required",
            ));
        }
        if self.labels.iter().any(|l| l.is_empty()) {
            return Err(crate::Error::config(
                "resource record labels cannot be empty",
            ));
        }
        Ok(())
    }
}
