//! # aliddns
//!
//! One-shot dynamic DNS reconciliation for Alibaba Cloud DNS.
//!
//! Each invocation performs a single pass: discover the public IPv4/IPv6
//! address, confirm the local interface owns it, and converge the domain's
//! A/AAAA records. Run it periodically from cron or a systemd timer; the
//! tool keeps no state between invocations.
//!
//! This binary is a thin integration layer: argument parsing, tracing
//! setup and component wiring. All reconciliation logic lives in
//! `aliddns-core`.
//!
//! ## Example
//!
//! ```bash
//! aliddns -k $ACCESS_KEY_ID -s $ACCESS_KEY_SECRET -d example.com
//! aliddns -k ... -s ... -d example.com -r @ -r www --dry-run
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use aliddns_core::config::{
    Credentials, DEFAULT_REGION_ID, DEFAULT_TIMEOUT_SECS, DiscoveryConfig, ReconcileTarget,
};
use aliddns_core::Reconciler;
use aliddns_ip_http::HttpResolver;
use aliddns_provider_alidns::AlidnsStore;

/// Exit codes for the different termination scenarios
///
/// - 0: pass completed (including "nothing to do")
/// - 1: configuration error, no network call was made
/// - 2: pass aborted (authentication failure, runtime error)
#[derive(Debug, Clone, Copy)]
enum RunExitCode {
    Converged = 0,
    ConfigError = 1,
    PassAborted = 2,
}

impl From<RunExitCode> for ExitCode {
    fn from(code: RunExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep Alibaba Cloud DNS records pointed at this machine's public address
#[derive(Debug, Parser)]
#[command(name = "aliddns", version, about)]
struct Cli {
    /// AccessKey ID
    #[arg(short = 'k', long, env = "ALIDDNS_ACCESS_KEY_ID")]
    access_key_id: String,

    /// AccessKey secret
    #[arg(short = 's', long, env = "ALIDDNS_ACCESS_KEY_SECRET", hide_env_values = true)]
    access_key_secret: String,

    /// Domain name to synchronize
    #[arg(short = 'd', long)]
    domain_name: String,

    /// Resource record label to synchronize; repeatable. Defaults to "@" and "*"
    #[arg(short = 'r', long = "resource-record", value_name = "RR")]
    resource_records: Vec<String>,

    /// Region ID
    #[arg(long, default_value = DEFAULT_REGION_ID)]
    region_id: String,

    /// Timeout for address discovery, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Describe records but never add or update
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "ALIDDNS_LOG_LEVEL")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().parse::<Level>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!("invalid log level: {}", cli.log_level);
            return RunExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
        return RunExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return RunExitCode::PassAborted.into();
        }
    };

    rt.block_on(run(cli)).into()
}

/// Wire the components and run one reconciliation pass
async fn run(cli: Cli) -> RunExitCode {
    let (reconciler, resolver) = match build(&cli) {
        Ok(parts) => parts,
        Err(e) => {
            error!("configuration error: {e:#}");
            return RunExitCode::ConfigError;
        }
    };

    info!(
        domain = %cli.domain_name,
        labels = ?reconciler.target().labels,
        dry_run = cli.dry_run,
        "starting reconciliation pass"
    );

    match reconciler.run(&resolver).await {
        Ok(actions) if actions.is_empty() => {
            info!("pass complete, records already current");
            RunExitCode::Converged
        }
        Ok(actions) => {
            info!(actions = actions.len(), "pass complete");
            RunExitCode::Converged
        }
        Err(e) => {
            error!("pass aborted: {e}");
            RunExitCode::PassAborted
        }
    }
}

/// Validate configuration and construct the store, resolver and reconciler.
///
/// Everything here fails before any network call is made.
fn build(cli: &Cli) -> anyhow::Result<(Reconciler, HttpResolver)> {
    let credentials = Credentials::new(cli.access_key_id.clone(), cli.access_key_secret.clone())
        .with_region(cli.region_id.clone());
    credentials.validate().context("invalid credentials")?;

    let mut target = ReconcileTarget::new(cli.domain_name.clone());
    if !cli.resource_records.is_empty() {
        target = target.with_labels(cli.resource_records.clone());
    }

    let discovery = DiscoveryConfig {
        timeout_secs: cli.timeout_secs,
        ..DiscoveryConfig::default()
    };

    let store = if cli.dry_run {
        AlidnsStore::dry_run(&credentials)
    } else {
        AlidnsStore::new(&credentials)
    }
    .context("failed to build alidns store")?;

    let resolver = HttpResolver::new(discovery).context("failed to build address resolver")?;
    let reconciler =
        Reconciler::new(Box::new(store), target).context("invalid reconciliation target")?;

    Ok((reconciler, resolver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn labels_are_repeatable() {
        let cli = Cli::parse_from([
            "aliddns",
            "-k",
            "ak",
            "-s",
            "secret",
            "-d",
            "example.com",
            "-r",
            "@",
            "-r",
            "www",
        ]);
        assert_eq!(cli.resource_records, vec!["@", "www"]);
        assert_eq!(cli.region_id, DEFAULT_REGION_ID);
        assert_eq!(cli.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn labels_default_to_empty_and_are_filled_by_target() {
        let cli = Cli::parse_from(["aliddns", "-k", "ak", "-s", "secret", "-d", "example.com"]);
        assert!(cli.resource_records.is_empty());

        let target = ReconcileTarget::new(cli.domain_name);
        assert_eq!(target.labels, vec!["@", "*"]);
    }
}
