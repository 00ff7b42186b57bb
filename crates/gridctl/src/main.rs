use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridctl_core::{LocalSession, SurfaceConfig};
use gridctl_launchpad::mapping::PORT_NAME_HINT;
use gridctl_launchpad::LaunchpadModule;

/// Grid controller surface for live clip launching.
#[derive(Parser, Debug)]
#[command(name = "gridctl")]
#[command(about = "Grid controller surface for live clip launching")]
struct Args {
    /// Substring to match when picking the MIDI port pair
    #[arg(long, default_value = PORT_NAME_HINT)]
    midi_port: String,

    /// List the available MIDI input ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Surface config file, created on first shutdown
    #[arg(long, default_value = "gridctl.json")]
    config: PathBuf,

    /// Log filter, e.g. "info" or "gridctl_core=trace"
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .init();

    if args.list_ports {
        let ports = LaunchpadModule::list_ports()?;
        if ports.is_empty() {
            println!("no MIDI input ports found");
        }
        for name in ports {
            println!("{name}");
        }
        return Ok(());
    }

    let config = SurfaceConfig::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let mut module = LaunchpadModule::new(
        Box::new(LocalSession::new()),
        config,
        args.config.clone(),
    )?;
    module
        .connect_midi(&args.midi_port)
        .context("connecting to the controller")?;

    tracing::info!("gridctl running, press Ctrl-C to stop");
    module.run().await?;
    Ok(())
}
