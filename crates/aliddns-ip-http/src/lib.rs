//! # aliddns-ip-http
//!
//! [`AddressResolver`] implementation backed by two external lookups:
//!
//! - **public address**: HTTPS GET against a family-specific "what is my
//!   IP" endpoint, queried over that family's transport (the client is
//!   pinned to an IPv4 or IPv6 local address)
//! - **local address**: a connected UDP socket toward the lookup host.
//!   Connecting a datagram socket transmits nothing; it only makes the
//!   kernel pick the source address it would use for that route, which
//!   `local_addr()` then reports. No STUN-like service is needed.
//!
//! Every operation is bounded by the configured timeout and every failure
//! degrades to an absent address with a warning, per the resolver contract.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tokio::net::{UdpSocket, lookup_host};
use tracing::warn;

use aliddns_core::config::DiscoveryConfig;
use aliddns_core::record::{Discovery, IpFamily};
use aliddns_core::traits::AddressResolver;
use aliddns_core::{Error, Result};

/// Resolver combining the HTTP lookup with the UDP source-address probe
pub struct HttpResolver {
    config: DiscoveryConfig,
    v4_client: reqwest::Client,
    v6_client: reqwest::Client,
}

impl HttpResolver {
    /// Build a resolver from discovery settings
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;

        let v4_client = family_client(IpAddr::V4(Ipv4Addr::UNSPECIFIED), &config)?;
        let v6_client = family_client(IpAddr::V6(Ipv6Addr::UNSPECIFIED), &config)?;

        Ok(Self {
            config,
            v4_client,
            v6_client,
        })
    }

    fn client(&self, family: IpFamily) -> &reqwest::Client {
        match family {
            IpFamily::V4 => &self.v4_client,
            IpFamily::V6 => &self.v6_client,
        }
    }

    /// Fetch the public address from the family's lookup endpoint
    async fn fetch_public(&self, family: IpFamily) -> Result<IpAddr> {
        let endpoint = self.config.endpoint(family);

        let response = self
            .client(family)
            .get(&endpoint.url)
            .send()
            .await
            .map_err(|e| Error::discovery(format!("request to {} failed: {e}", endpoint.url)))?;

        if !response.status().is_success() {
            return Err(Error::discovery(format!(
                "{} returned {}",
                endpoint.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::discovery(format!("failed to read lookup response: {e}")))?;
        let text = body.trim();

        if text.is_empty() {
            return Err(Error::discovery(format!(
                "{} returned an empty body",
                endpoint.url
            )));
        }

        let ip: IpAddr = text
            .parse()
            .map_err(|_| Error::discovery(format!("invalid address in lookup response: {text}")))?;

        if !family.matches(ip) {
            return Err(Error::discovery(format!(
                "expected an {family} address, got {ip}"
            )));
        }

        Ok(ip)
    }

    /// Learn which local address the OS would route toward the probe host.
    ///
    /// The socket lives only inside this call; drop releases it on every
    /// path, success or failure.
    async fn probe_local(&self, family: IpFamily) -> Result<IpAddr> {
        let endpoint = self.config.endpoint(family);

        let bind_addr: SocketAddr = match family {
            IpFamily::V4 => (IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0).into(),
            IpFamily::V6 => (IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr).await?;

        let target = lookup_host((endpoint.probe_host.as_str(), self.config.probe_port))
            .await?
            .find(|addr| family.matches(addr.ip()))
            .ok_or_else(|| {
                Error::discovery(format!(
                    "{} has no {family} address",
                    endpoint.probe_host
                ))
            })?;

        socket.connect(target).await?;
        Ok(socket.local_addr()?.ip())
    }
}

#[async_trait]
impl AddressResolver for HttpResolver {
    async fn discover(&self, family: IpFamily) -> Discovery {
        let public = match self.fetch_public(family).await {
            Ok(ip) => Some(ip),
            Err(err) => {
                warn!(%family, error = %err, "public address lookup failed");
                None
            }
        };

        // Without a public address the family is skipped downstream, so
        // there is nothing to compare the probe result against.
        let local = if public.is_some() {
            match tokio::time::timeout(self.config.timeout(), self.probe_local(family)).await {
                Ok(Ok(ip)) => Some(ip),
                Ok(Err(err)) => {
                    warn!(%family, error = %err, "local address probe failed");
                    None
                }
                Err(_) => {
                    warn!(%family, timeout_secs = self.config.timeout_secs,
                        "local address probe timed out");
                    None
                }
            }
        } else {
            None
        };

        Discovery { public, local }
    }
}

fn family_client(local: IpAddr, config: &DiscoveryConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .local_address(local)
        .build()
        .map_err(|e| Error::discovery(format!("failed to build HTTP client: {e}")))
}
