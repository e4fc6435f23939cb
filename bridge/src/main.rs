use anyhow::Context;
use clap::Parser;
use flarmcore::processing::{AltitudeUnit, SpeedUnit, SuppressionRule};
use log::{error, info};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

use generator::{ScenarioConfig, SyntheticSource};
use source::{FileSource, HttpSource, SnapshotSource};
use transport::{Transport, UdpTransport};
use workflow::config::{BridgeConfig, Overrides, SourceConfig};
use workflow::runner::TrafficCycle;

mod generator;
mod source;
mod transport;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Broadcast Condor spectator traffic as FLARM PFLAA sentences")]
struct Args {
    /// Load bridge settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Competition number (CN) of the ownship
    #[arg(long)]
    target: Option<String>,
    /// Read snapshots from a spectator JSON file
    #[arg(long, conflicts_with_all = ["url", "synthetic"])]
    file: Option<PathBuf>,
    /// Poll snapshots from the spectator HTTP endpoint
    #[arg(long, conflicts_with = "synthetic")]
    url: Option<String>,
    /// Generate synthetic traffic instead of talking to Condor
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    /// Destination host for UDP sentences
    #[arg(long)]
    host: Option<String>,
    /// Destination port for UDP sentences
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    period_ms: Option<u64>,
    /// raw | feet
    #[arg(long, value_parser = parse_choice::<AltitudeUnit>)]
    altitude_unit: Option<AltitudeUnit>,
    /// raw | knots
    #[arg(long, value_parser = parse_choice::<SpeedUnit>)]
    speed_unit: Option<SpeedUnit>,
    /// colocated | axis_zero
    #[arg(long, value_parser = parse_choice::<SuppressionRule>)]
    suppression: Option<SuppressionRule>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        let source = if let Some(path) = &self.file {
            Some(SourceConfig::File { path: path.clone() })
        } else if let Some(url) = &self.url {
            Some(SourceConfig::Http { url: url.clone() })
        } else if self.synthetic {
            Some(SourceConfig::Synthetic(ScenarioConfig::default()))
        } else {
            None
        };

        Overrides {
            target_cn: self.target.clone(),
            source,
            host: self.host.clone(),
            port: self.port,
            cycle_period_ms: self.period_ms,
            altitude_unit: self.altitude_unit,
            speed_unit: self.speed_unit,
            suppression: self.suppression,
        }
    }
}

fn parse_choice<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_yaml::from_str(value).map_err(|_| format!("unknown value '{}'", value))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        BridgeConfig::load(path)?
    } else {
        BridgeConfig::default()
    };
    config.apply(args.overrides());
    config.validate()?;

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;
    runtime.block_on(run(config))
}

async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let transport = UdpTransport::connect(&config.destination.host, config.destination.port)
        .await
        .with_context(|| {
            format!(
                "opening UDP socket to {}:{}",
                config.destination.host, config.destination.port
            )
        })?;

    match config.source.clone() {
        SourceConfig::File { path } => drive(&config, FileSource::new(path), transport).await,
        SourceConfig::Http { url } => {
            let source = HttpSource::new(url).context("building HTTP client")?;
            drive(&config, source, transport).await
        }
        SourceConfig::Synthetic(scenario) => {
            drive(&config, SyntheticSource::new(scenario, &config.target_cn), transport).await
        }
    }
}

async fn drive<S: SnapshotSource, T: Transport>(
    config: &BridgeConfig,
    source: S,
    transport: T,
) -> anyhow::Result<()> {
    info!("Grabbing data from: {}", source.describe());
    info!(
        "Sending data to: {} every {:?}",
        transport.describe(),
        config.cycle_period()
    );

    let cycle = TrafficCycle::new(config, source, transport);
    info!(
        "Target CN: {} in hex: {}",
        cycle.state().target_cn,
        cycle.state().target_hex
    );

    cycle.run(shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("cannot listen for Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
