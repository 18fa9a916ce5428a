//! Binary entry point: CLI parsing, logging setup, wiring the real OS
//! services into the app context, and running the tray event loop.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tray_guid::app::App;
use tray_guid::config::{Config, CONFIG_FILE};
use tray_guid::generator::UuidGenerator;
use tray_guid::global_hotkey::SystemRegistrar;
use tray_guid::key_sender::KeySender;
use tray_guid::tray::{self, SystemTray};

#[derive(Parser, Debug)]
#[command(name = "tray-guid", version, about = "Types a fresh UUID on a global hotkey")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: String,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    show_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if args.show_config {
        let config = Config::load_from(&args.config);
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    tray::init().context("failed to initialize tray platform")?;

    let registrar = SystemRegistrar::new().context("failed to access hotkey service")?;
    let sender = KeySender::new().context("failed to open input backend")?;
    let icon = SystemTray::new().context("failed to create tray icon")?;

    let app = App::start(args.config, registrar, sender, UuidGenerator::new(), icon);
    tray::run(app)?;

    Ok(())
}
