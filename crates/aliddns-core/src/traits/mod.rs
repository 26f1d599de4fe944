//! Trait definitions for the aliddns system.
//!
//! Two seams separate the core algorithm from the outside world:
//! - [`RecordStore`]: the DNS provider's describe/add/update surface
//! - [`AddressResolver`]: public/local address discovery per IP family

pub mod address_resolver;
pub mod record_store;

pub use address_resolver::AddressResolver;
pub use record_store::RecordStore;
