//! Address discovery trait.

use async_trait::async_trait;

use crate::record::{Discovery, IpFamily};

/// Trait for address discovery implementations
///
/// `discover` is infallible by signature: discovery failures are routine in
/// this domain (no v6 connectivity, flaky lookup service, captive network),
/// so every failure degrades to an absent address and the reconciler skips
/// the family for this pass. Implementations log the reason at warn level.
///
/// No retries inside a call; the scheduler invoking the tool provides
/// cadence.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Discover the public and local address for one family
    async fn discover(&self, family: IpFamily) -> Discovery;
}
