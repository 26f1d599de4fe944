//! # aliddns-core
//!
//! Core library for the aliddns dynamic DNS tool.
//!
//! The tool keeps a DNS provider's A/AAAA records synchronized with the
//! machine's current public address. This crate owns everything with
//! design substance:
//!
//! - **[`AddressResolver`]**: trait for discovering the public and local
//!   address of each IP family
//! - **[`RecordStore`]**: trait for the provider's describe/add/update
//!   surface
//! - **[`Reconciler`]**: the algorithm that decides whether an update is
//!   warranted and issues the minimal add/update calls
//!
//! ## Design principles
//!
//! 1. **Stateless**: every pass re-reads the provider's records; nothing is
//!    persisted between invocations
//! 2. **Idempotent**: a second pass with an unchanged address performs zero
//!    mutating calls
//! 3. **NAT-safe**: a public address is only published when the local
//!    interface was confirmed to own it
//! 4. **Per-family degradation**: discovery or provider trouble on one
//!    family never blocks the other

pub mod config;
pub mod error;
pub mod reconciler;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, DiscoveryConfig, FamilyEndpoint, ReconcileTarget};
pub use error::{Error, Result};
pub use reconciler::Reconciler;
pub use record::{Discovery, DomainRecord, IpFamily, RecordAction, RecordSet, RecordType};
pub use traits::{AddressResolver, RecordStore};
