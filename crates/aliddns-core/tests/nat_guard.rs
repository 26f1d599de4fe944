//! NAT guard: when the local interface does not own the observed public
//! address (or either side is absent), the family is skipped and no
//! provider call of any kind is made for it.

mod common;

use aliddns_core::Reconciler;
use aliddns_core::record::{Discovery, IpFamily};
use common::*;

#[tokio::test]
async fn mismatched_addresses_make_zero_provider_calls() {
    let store = FakeRecordStore::new();
    let resolver = FixedResolver::offline().with_v4(natted("203.0.113.9", "192.168.1.7"));
    let reconciler =
        Reconciler::new(Box::new(store.clone()), target("example.com")).expect("valid target");

    let actions = reconciler.run(&resolver).await.expect("pass completes");

    assert!(actions.is_empty());
    assert_eq!(store.describe_calls(), 0, "not even describe is issued");
    assert_eq!(store.mutation_count(), 0);
}

#[tokio::test]
async fn absent_public_address_skips_family() {
    let store = FakeRecordStore::new();
    let reconciler =
        Reconciler::new(Box::new(store.clone()), target("example.com")).expect("valid target");

    let discovery = Discovery {
        public: None,
        local: Some(ip("192.168.1.7")),
    };
    let actions = reconciler
        .reconcile_family(IpFamily::V4, &discovery)
        .await
        .expect("skip is not an error");

    assert!(actions.is_empty());
    assert_eq!(store.describe_calls(), 0);
}

#[tokio::test]
async fn absent_local_address_skips_family() {
    let store = FakeRecordStore::new();
    let reconciler =
        Reconciler::new(Box::new(store.clone()), target("example.com")).expect("valid target");

    let discovery = Discovery {
        public: Some(ip("203.0.113.9")),
        local: None,
    };
    let actions = reconciler
        .reconcile_family(IpFamily::V4, &discovery)
        .await
        .expect("skip is not an error");

    assert!(actions.is_empty());
    assert_eq!(store.describe_calls(), 0);
}
