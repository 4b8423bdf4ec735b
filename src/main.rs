//! volumed - main entry point
//!
//! Loads configuration, spawns the controller worker that owns the
//! PulseAudio connection, and serves the HTTP API until shutdown.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use volumed::api::{self, AppContext};
use volumed::config::Config;
use volumed::controller::VolumeController;
use volumed::pulse::PulseBackend;
use volumed::worker::ControllerHandle;

/// Command-line arguments for volumed
#[derive(Parser, Debug)]
#[command(name = "volumed")]
#[command(about = "HTTP volume control for the local PulseAudio server")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "VOLUMED_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "VOLUMED_BIND")]
    bind: Option<std::net::IpAddr>,

    /// Volume step percent for up/down
    #[arg(short, long, env = "VOLUMED_STEP")]
    step: Option<u8>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Command line > environment > TOML file > built-in defaults
    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(step) = args.step {
        config.step = step;
    }
    config.validate().context("Invalid configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "volumed={level},tower_http={level}",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting volumed on {}:{} (volume step {}%)",
        config.bind, config.port, config.step
    );

    // The PulseAudio handle is created on the worker thread; the first
    // operation connects lazily and reconnects happen there too.
    let step = config.step;
    let controller =
        ControllerHandle::spawn(move || VolumeController::new(PulseBackend::new(), step))
            .context("Failed to start volume controller worker")?;

    api::run(&config, AppContext { controller }).await?;

    info!("Server shutdown complete");
    Ok(())
}
