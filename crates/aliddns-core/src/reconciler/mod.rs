//! The reconciliation algorithm.
//!
//! One pass per invocation, one sub-pass per IP family:
//!
//! ```text
//! ┌──────────────────┐   Discovery    ┌──────────────┐
//! │ AddressResolver  │ ─────────────▶ │  Reconciler  │
//! └──────────────────┘  (per family)  └──────────────┘
//!                                            │ describe, then
//!                                            │ minimal add/update
//!                                            ▼
//!                                     ┌──────────────┐
//!                                     │ RecordStore  │
//!                                     └──────────────┘
//! ```
//!
//! The reconciler holds no state between invocations: every pass re-reads
//! the provider's records and re-derives the required actions, so a second
//! pass with an unchanged address performs zero mutating calls.

use tracing::{debug, error, info, warn};

use crate::config::ReconcileTarget;
use crate::error::{Error, Result};
use crate::record::{Discovery, DomainRecord, IpFamily, RecordAction};
use crate::traits::{AddressResolver, RecordStore};
use std::net::IpAddr;

/// Drives one reconciliation pass against a single provider
pub struct Reconciler {
    store: Box<dyn RecordStore>,
    target: ReconcileTarget,
}

impl Reconciler {
    /// Create a reconciler for one target
    pub fn new(store: Box<dyn RecordStore>, target: ReconcileTarget) -> Result<Self> {
        target.validate()?;
        Ok(Self { store, target })
    }

    /// The target this reconciler converges
    pub fn target(&self) -> &ReconcileTarget {
        &self.target
    }

    /// Run one full pass: discover and reconcile IPv4, then IPv6.
    ///
    /// The families are independent: a discovery or provider failure on one
    /// is logged and does not stop the other. The single exception is an
    /// authentication failure, which dooms every remaining call and aborts
    /// the pass.
    pub async fn run(&self, resolver: &dyn AddressResolver) -> Result<Vec<RecordAction>> {
        let mut actions = Vec::new();
        let mut any_public = false;

        for family in [IpFamily::V4, IpFamily::V6] {
            let discovery = resolver.discover(family).await;
            any_public |= discovery.public.is_some();

            match self.reconcile_family(family, &discovery).await {
                Ok(mut taken) => actions.append(&mut taken),
                Err(err) if err.is_auth() => {
                    error!(provider = self.store.provider_name(), error = %err,
                        "authentication failed, aborting pass");
                    return Err(err);
                }
                Err(err) => {
                    error!(%family, error = %err, "reconciliation failed for family");
                }
            }
        }

        if !any_public {
            warn!("no public address found for either family");
        }

        Ok(actions)
    }

    /// Reconcile the records of one family against a discovery result.
    ///
    /// Does nothing unless the public address was confirmed as locally
    /// owned; a NATed or absent address must not be published. Provider
    /// failures on individual labels are logged and the remaining labels
    /// are still attempted, except authentication failures which abort.
    pub async fn reconcile_family(
        &self,
        family: IpFamily,
        discovery: &Discovery,
    ) -> Result<Vec<RecordAction>> {
        let Some(public) = discovery.confirmed() else {
            match (discovery.public, discovery.local) {
                (None, _) => debug!(%family, "no public address, skipping family"),
                (_, None) => warn!(%family, "no local address, skipping family"),
                (Some(public), Some(local)) => warn!(
                    %family, %public, %local,
                    "public address is not locally owned (NAT?), skipping family"
                ),
            }
            return Ok(Vec::new());
        };

        let record_type = family.record_type();
        let existing = self.store.describe(&self.target.domain, record_type).await?;

        let mut actions = Vec::new();

        if existing.total_count == 0 {
            for rr in &self.target.labels {
                self.add_record(rr, record_type, public, &mut actions)
                    .await?;
            }
            return Ok(actions);
        }

        for rr in &self.target.labels {
            let matches: Vec<&DomainRecord> = existing
                .records
                .iter()
                .filter(|record| record.rr == *rr && record.record_type == record_type)
                .collect();

            if matches.len() > 1 {
                warn!(
                    %family, %rr, count = matches.len(),
                    "multiple records share this label and type, updating the first only"
                );
            }

            match matches.first() {
                Some(record) if value_current(record, public) => {
                    debug!(%rr, value = %public, "record already current");
                }
                Some(record) => match self
                    .store
                    .update(&record.rr, &record.record_id, record_type, public)
                    .await
                {
                    Ok(()) => {
                        info!(
                            %rr, domain = %self.target.domain, %record_type,
                            previous = record.value.trim(), value = %public,
                            "updated record"
                        );
                        actions.push(RecordAction::Updated {
                            rr: record.rr.clone(),
                            previous: record.value.trim().to_string(),
                            value: public,
                        });
                    }
                    Err(err) if err.is_auth() => return Err(err),
                    Err(err) => {
                        error!(%rr, error = %err, "update failed, continuing with remaining labels");
                    }
                },
                None => {
                    self.add_record(rr, record_type, public, &mut actions)
                        .await?;
                }
            }
        }

        Ok(actions)
    }

    /// Add one record, logging success and tolerating non-auth failures
    async fn add_record(
        &self,
        rr: &str,
        record_type: crate::record::RecordType,
        value: IpAddr,
        actions: &mut Vec<RecordAction>,
    ) -> Result<()> {
        match self
            .store
            .add(rr, &self.target.domain, record_type, value)
            .await
        {
            Ok(()) => {
                info!(
                    %rr, domain = %self.target.domain, %record_type, %value,
                    "added record"
                );
                actions.push(RecordAction::Added {
                    rr: rr.to_string(),
                    value,
                });
                Ok(())
            }
            Err(err) if err.is_auth() => Err(err),
            Err(err) => {
                error!(%rr, error = %err, "add failed, continuing with remaining labels");
                Ok(())
            }
        }
    }
}

/// Whether a stored record value already equals the confirmed address.
///
/// Parsed comparison, so textual AAAA variants (case, zero compression)
/// compare equal. A value that does not parse counts as stale.
fn value_current(record: &DomainRecord, public: IpAddr) -> bool {
    match record.value.trim().parse::<IpAddr>() {
        Ok(stored) => stored == public,
        Err(_) => false,
    }
}
