use anyhow::{Context, Result};
use clap::Parser;
use corner_plot::{Cli, Config, CornerPlotter};
use log::{debug, info};

fn main() -> Result<()> {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let cli = Cli::parse();
    let config = Config::from_cli(cli).context("Invalid configuration")?;
    debug!("Config: {:?}", config);

    let file = config.file.clone();
    let plotter = CornerPlotter::new(config)?;
    let count = plotter
        .run()
        .with_context(|| format!("Failed to plot corners from {}", file.display()))?;

    info!("Plotted {} corners", count);
    Ok(())
}
