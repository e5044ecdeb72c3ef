mod commands;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap_derive::{Parser, Subcommand};
use gpio_control_rs::logging::{LogConfig, RotationPeriod, init_logging};

#[derive(Subcommand, Debug, Default, Clone)]
enum Commands {
    /// Show every configured pin with its current state
    #[default]
    List,
    /// Turn on the pin at the given position
    On { index: usize },
    /// Turn off the pin at the given position
    Off { index: usize },
    /// Append a pin configuration and save it
    Add {
        #[arg(long, default_value = "0")]
        pin: u32,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "plug")]
        icon: String,
        #[arg(long)]
        active_low: bool,
        #[arg(long)]
        default_on: bool,
    },
    /// Remove the pin configuration at the given position and save
    Remove { index: usize },
    /// List the boards offered by the host
    Boards,
    /// Read commands from stdin, keeping pin state between them
    Shell,
}

#[derive(Parser, Debug)]
pub struct Params {
    /// JSON settings file holding the GPIO configurations
    #[clap(long, env = "GPIO_CONTROL_SETTINGS", default_value = "gpio_settings.json")]
    settings: PathBuf,
    /// Directory for rolling log files (if not set, logs go to stderr only)
    #[clap(long)]
    log_dir: Option<PathBuf>,
    /// Log rotation: hourly, daily or never
    #[clap(long, default_value = "daily")]
    rotation: RotationPeriod,
    /// Timeout in milliseconds for every host request
    #[clap(long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();
    let _log_guard = init_logging(&LogConfig {
        log_dir: params.log_dir.clone(),
        rotation: params.rotation,
        ..Default::default()
    })?;

    match params.command.clone().unwrap_or_default() {
        Commands::List => commands::list(&params).await?,
        Commands::On { index } => commands::switch(&params, index, true).await?,
        Commands::Off { index } => commands::switch(&params, index, false).await?,
        Commands::Add {
            pin,
            name,
            icon,
            active_low,
            default_on,
        } => commands::add(&params, pin, name, icon, active_low, default_on).await?,
        Commands::Remove { index } => commands::remove(&params, index).await?,
        Commands::Boards => commands::boards(&params).await?,
        Commands::Shell => commands::shell(&params).await?,
    }

    Ok(())
}
