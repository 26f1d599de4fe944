//! # aliddns-provider-alidns
//!
//! [`RecordStore`] implementation over the Alibaba Cloud DNS RPC API
//! (version 2015-01-09): `DescribeDomainRecords`, `AddDomainRecord`,
//! `UpdateDomainRecord`.
//!
//! The store is a stateless single-shot adapter:
//!
//! - one signed HTTP request per trait method, no retries or backoff
//!   (cadence belongs to whatever schedules the tool)
//! - no caching of records between calls
//! - provider error payloads are mapped onto the core error taxonomy and
//!   never interpreted beyond that
//!
//! ## Security
//!
//! The access key secret never appears in logs; the `Debug` implementation
//! redacts it.
//!
//! ## Dry-run mode
//!
//! With [`AlidnsStore::dry_run`], describe calls run normally but add and
//! update log the intended mutation and return without touching DNS.

mod sign;

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use aliddns_core::config::Credentials;
use aliddns_core::record::{DomainRecord, RecordSet, RecordType};
use aliddns_core::traits::RecordStore;
use aliddns_core::{Error, Result};

use sign::SigningInput;

/// API version of the alidns RPC interface
const API_VERSION: &str = "2015-01-09";

/// Timeout for provider API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records fetched per describe call (alidns maximum)
const PAGE_SIZE: &str = "500";

/// Alibaba Cloud DNS record store
pub struct AlidnsStore {
    access_key_id: String,
    /// Never logged
    access_key_secret: String,
    endpoint: String,
    host: String,
    client: reqwest::Client,
    dry_run: bool,
}

impl std::fmt::Debug for AlidnsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlidnsStore")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl AlidnsStore {
    /// Create a store against the region's API endpoint
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let endpoint = format!("https://alidns.{}.aliyuncs.com", credentials.region_id);
        Self::with_endpoint(credentials, endpoint, false)
    }

    /// Create a store that describes normally but never mutates
    pub fn dry_run(credentials: &Credentials) -> Result<Self> {
        let endpoint = format!("https://alidns.{}.aliyuncs.com", credentials.region_id);
        Self::with_endpoint(credentials, endpoint, true)
    }

    /// Create a store against an explicit endpoint (tests, private stacks)
    pub fn with_endpoint(
        credentials: &Credentials,
        endpoint: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        credentials.validate()?;

        let endpoint = endpoint.into();
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let host = endpoint
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            access_key_id: credentials.access_key_id.clone(),
            access_key_secret: credentials.access_key_secret.clone(),
            endpoint,
            host,
            client,
            dry_run,
        })
    }

    /// Issue one signed GET request for an RPC action
    async fn call(&self, action: &str, params: &[(String, String)]) -> Result<serde_json::Value> {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = format!("{:032x}", rand::random::<u128>());

        let input = SigningInput {
            method: "GET",
            host: &self.host,
            action,
            version: API_VERSION,
            date: &date,
            nonce: &nonce,
            query: params,
        };
        let authorization = sign::authorization(&input, &self.access_key_id, &self.access_key_secret);

        let url = format!("{}/?{}", self.endpoint, sign::canonical_query(params));
        debug!(action, "calling alidns");

        let response = self
            .client
            .get(&url)
            .header("x-acs-action", action)
            .header("x-acs-version", API_VERSION)
            .header("x-acs-date", &date)
            .header("x-acs-signature-nonce", &nonce)
            .header("x-acs-content-sha256", sign::sha256_hex(b""))
            .header("Authorization", authorization)
            .send()
            .await
            .map_err(|e| Error::http(format!("{action} request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read {action} response: {e}")))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        serde_json::from_str(&body).map_err(Error::from)
    }
}

/// Error body the RPC interface returns on failure
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

/// Map an alidns failure onto the core taxonomy.
///
/// Credential problems become [`Error::Authentication`] so the reconciler
/// can abort the pass instead of retrying every label with doomed keys.
fn classify_failure(status: reqwest::StatusCode, body: &str) -> Error {
    let api_error: ApiError = serde_json::from_str(body).unwrap_or(ApiError {
        code: String::new(),
        message: String::new(),
    });

    let code = api_error.code.as_str();
    let detail = if code.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("{code}: {}", api_error.message)
    };

    if code.starts_with("InvalidAccessKeyId")
        || code == "SignatureDoesNotMatch"
        || code.starts_with("Forbidden")
        || status == reqwest::StatusCode::UNAUTHORIZED
    {
        Error::auth(detail)
    } else if code.starts_with("Throttling") || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        Error::rate_limited(detail)
    } else {
        Error::provider("alidns", detail)
    }
}

/// `DescribeDomainRecords` response shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeResponse {
    total_count: u64,
    #[serde(default)]
    domain_records: RecordList,
}

#[derive(Debug, Default, Deserialize)]
struct RecordList {
    #[serde(rename = "Record", default)]
    record: Vec<DomainRecord>,
}

#[async_trait]
impl RecordStore for AlidnsStore {
    async fn describe(&self, domain: &str, record_type: RecordType) -> Result<RecordSet> {
        let params = vec![
            ("DomainName".to_string(), domain.to_string()),
            ("Type".to_string(), record_type.as_str().to_string()),
            ("PageSize".to_string(), PAGE_SIZE.to_string()),
        ];

        let value = self.call("DescribeDomainRecords", &params).await?;
        let response: DescribeResponse = serde_json::from_value(value)?;

        Ok(RecordSet {
            total_count: response.total_count,
            records: response.domain_records.record,
        })
    }

    async fn add(
        &self,
        rr: &str,
        domain: &str,
        record_type: RecordType,
        value: IpAddr,
    ) -> Result<()> {
        if self.dry_run {
            info!(rr, domain, %record_type, %value, "dry run: would add record");
            return Ok(());
        }

        let params = vec![
            ("RR".to_string(), rr.to_string()),
            ("DomainName".to_string(), domain.to_string()),
            ("Type".to_string(), record_type.as_str().to_string()),
            ("Value".to_string(), value.to_string()),
        ];
        self.call("AddDomainRecord", &params).await?;
        Ok(())
    }

    async fn update(
        &self,
        rr: &str,
        record_id: &str,
        record_type: RecordType,
        value: IpAddr,
    ) -> Result<()> {
        if self.dry_run {
            info!(rr, record_id, %record_type, %value, "dry run: would update record");
            return Ok(());
        }

        let params = vec![
            ("RR".to_string(), rr.to_string()),
            ("RecordId".to_string(), record_id.to_string()),
            ("Type".to_string(), record_type.as_str().to_string()),
            ("Value".to_string(), value.to_string()),
        ];
        self.call("UpdateDomainRecord", &params).await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "alidns"
    }
}
