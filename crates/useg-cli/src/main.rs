//! `useg` — micro-segment an existing ACI EPG.
//!
//! ```bash
//! useg T1 P1 Base                      # static flow files
//! useg T1 P1 Base --application shop   # live analytics
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use useg_appflow::{AppDynamicsClient, FlowLoader, StaticFlowSource};
use useg_common::EpgIdentity;
use useg_engine::MicroSegmenter;
use useg_fabric::{ApicCommitter, ApicLookup, ApicSession};

mod config;

#[derive(Parser)]
#[command(name = "useg")]
#[command(version = "0.1.0")]
#[command(about = "Micro-segment an existing EPG into per-tier micro-EPGs", long_about = None)]
struct Cli {
    /// Tenant owning the base EPG
    tenant: String,

    /// Application profile under the tenant
    app_profile: String,

    /// Base EPG to segment
    epg: String,

    /// Monitored application name; omit to use the static flow files
    #[arg(long, short, default_value = "")]
    application: String,

    /// Config file path (default: ~/.useg/config.toml)
    #[arg(long, env = "USEG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the flow-data directory from the config file
    #[arg(long, env = "USEG_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    let session = Arc::new(ApicSession::new(&config.apic)?);
    session
        .login(&config.apic.username, &config.apic.password)
        .await?;

    let data_dir = cli
        .data_dir
        .or(config.data_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let analytics = match &config.appdynamics {
        Some(appd) => Some(AppDynamicsClient::new(appd)?),
        None => None,
    };
    let flows = FlowLoader::new(StaticFlowSource::new(data_dir), analytics);

    let segmenter = MicroSegmenter::new(
        ApicLookup::new(Arc::clone(&session)),
        ApicCommitter::new(session),
        flows,
    );

    let identity = EpgIdentity::new(cli.tenant, cli.app_profile, cli.epg, cli.application);
    let report = segmenter.segment(&identity).await?;

    println!(
        "Micro-segmented {} into {} tier EPGs ({} endpoints, {} contract references)",
        identity.epg_dn(),
        report.tiers,
        report.endpoints,
        report.contract_refs
    );
    Ok(())
}
