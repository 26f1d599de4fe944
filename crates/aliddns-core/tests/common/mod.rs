//! Test doubles and common utilities for reconciler tests.
//!
//! `FakeRecordStore` behaves like a tiny in-memory provider: describe
//! filters by record type, add and update mutate the record set, and every
//! call is counted so tests can assert exactly which provider calls a pass
//! issued. Clones share state, so a test can keep one handle and box the
//! other into the reconciler.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use aliddns_core::error::Result;
use aliddns_core::record::{Discovery, DomainRecord, IpFamily, RecordSet, RecordType};
use aliddns_core::traits::{AddressResolver, RecordStore};
use aliddns_core::{Error, ReconcileTarget};
use async_trait::async_trait;

/// Failure a test can inject into the fake store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Credentials rejected
    Auth,
    /// Any other provider-side failure
    Provider,
}

impl InjectedFailure {
    fn to_error(self) -> Error {
        match self {
            InjectedFailure::Auth => Error::auth("InvalidAccessKeyId.NotFound"),
            InjectedFailure::Provider => Error::provider("fake", "simulated failure"),
        }
    }
}

/// In-memory record store that counts and records every call
#[derive(Clone)]
pub struct FakeRecordStore {
    records: Arc<Mutex<Vec<DomainRecord>>>,
    next_id: Arc<AtomicUsize>,

    describe_calls: Arc<AtomicUsize>,
    add_calls: Arc<Mutex<Vec<(String, IpAddr)>>>,
    update_calls: Arc<Mutex<Vec<(String, String, IpAddr)>>>,

    describe_failure: Arc<Mutex<Option<(Option<RecordType>, InjectedFailure)>>>,
    failing_add_labels: Arc<Mutex<HashSet<String>>>,
    update_failure: Arc<Mutex<Option<InjectedFailure>>>,
}

impl FakeRecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
            describe_calls: Arc::new(AtomicUsize::new(0)),
            add_calls: Arc::new(Mutex::new(Vec::new())),
            update_calls: Arc::new(Mutex::new(Vec::new())),
            describe_failure: Arc::new(Mutex::new(None)),
            failing_add_labels: Arc::new(Mutex::new(HashSet::new())),
            update_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Seed an existing record, returning its generated ID
    pub fn seed(&self, rr: &str, record_type: RecordType, value: &str) -> String {
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.records.lock().unwrap().push(DomainRecord {
            rr: rr.to_string(),
            record_id: id.clone(),
            record_type,
            value: value.to_string(),
        });
        id
    }

    /// Make every describe call fail
    pub fn fail_describe(&self, failure: InjectedFailure) {
        *self.describe_failure.lock().unwrap() = Some((None, failure));
    }

    /// Make describe calls for one record type fail
    pub fn fail_describe_for(&self, record_type: RecordType, failure: InjectedFailure) {
        *self.describe_failure.lock().unwrap() = Some((Some(record_type), failure));
    }

    /// Make add calls for one label fail (non-auth provider error)
    pub fn fail_adds_for(&self, rr: &str) {
        self.failing_add_labels
            .lock()
            .unwrap()
            .insert(rr.to_string());
    }

    /// Make update calls fail
    pub fn fail_updates(&self, failure: InjectedFailure) {
        *self.update_failure.lock().unwrap() = Some(failure);
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// (rr, value) pairs from successful add calls
    pub fn added(&self) -> Vec<(String, IpAddr)> {
        self.add_calls.lock().unwrap().clone()
    }

    /// (rr, record_id, value) triples from successful update calls
    pub fn updated(&self) -> Vec<(String, String, IpAddr)> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.add_calls.lock().unwrap().len() + self.update_calls.lock().unwrap().len()
    }

    /// Current value of a record by ID, if it exists
    pub fn value_of(&self, record_id: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.record_id == record_id)
            .map(|r| r.value.clone())
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn describe(&self, _domain: &str, record_type: RecordType) -> Result<RecordSet> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((scope, failure)) = *self.describe_failure.lock().unwrap() {
            if scope.is_none_or(|scoped| scoped == record_type) {
                return Err(failure.to_error());
            }
        }

        let records: Vec<DomainRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.record_type == record_type)
            .cloned()
            .collect();

        Ok(RecordSet {
            total_count: records.len() as u64,
            records,
        })
    }

    async fn add(
        &self,
        rr: &str,
        _domain: &str,
        record_type: RecordType,
        value: IpAddr,
    ) -> Result<()> {
        if self.failing_add_labels.lock().unwrap().contains(rr) {
            return Err(InjectedFailure::Provider.to_error());
        }

        self.add_calls
            .lock()
            .unwrap()
            .push((rr.to_string(), value));
        self.seed(rr, record_type, &value.to_string());
        Ok(())
    }

    async fn update(
        &self,
        rr: &str,
        record_id: &str,
        _record_type: RecordType,
        value: IpAddr,
    ) -> Result<()> {
        if let Some(failure) = *self.update_failure.lock().unwrap() {
            return Err(failure.to_error());
        }

        self.update_calls
            .lock()
            .unwrap()
            .push((rr.to_string(), record_id.to_string(), value));

        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.record_id == record_id) {
            record.value = value.to_string();
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Resolver returning fixed discovery results per family
pub struct FixedResolver {
    pub v4: Discovery,
    pub v6: Discovery,
}

impl FixedResolver {
    /// Neither family discovers anything
    pub fn offline() -> Self {
        Self {
            v4: Discovery::default(),
            v6: Discovery::default(),
        }
    }

    pub fn with_v4(mut self, discovery: Discovery) -> Self {
        self.v4 = discovery;
        self
    }

    pub fn with_v6(mut self, discovery: Discovery) -> Self {
        self.v6 = discovery;
        self
    }
}

#[async_trait]
impl AddressResolver for FixedResolver {
    async fn discover(&self, family: IpFamily) -> Discovery {
        match family {
            IpFamily::V4 => self.v4,
            IpFamily::V6 => self.v6,
        }
    }
}

/// Discovery where the local interface owns the public address
pub fn owned(ip: &str) -> Discovery {
    let ip: IpAddr = ip.parse().expect("valid test address");
    Discovery {
        public: Some(ip),
        local: Some(ip),
    }
}

/// Discovery where the observed public address differs from the local one
pub fn natted(public: &str, local: &str) -> Discovery {
    Discovery {
        public: Some(public.parse().expect("valid test address")),
        local: Some(local.parse().expect("valid test address")),
    }
}

pub fn target(domain: &str) -> ReconcileTarget {
    ReconcileTarget::new(domain)
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid test address")
}
