//! BLE broadcast tool for Lumen smart lamps
//!
//! Encodes lamp commands into BLE advertising packets and broadcasts them
//! over a local HCI device. No connection is made; the lamp only listens.

mod hci;
mod lamp;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lumen-ble")]
#[command(about = "Control Lumen smart lamps over BLE advertising broadcasts")]
struct Cli {
    /// Lamp name (the name used during setup)
    #[arg(short, long)]
    name: String,

    /// HCI device index (the N of hciN)
    #[arg(short, long, default_value = "0")]
    device: u16,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair with a lamp that is in setup mode
    Setup,
    /// Turn the lamp on
    On,
    /// Turn the lamp off
    Off,
    /// Set the cold-white channel brightness
    Cold {
        /// Brightness level, 1 to 10
        level: u8,
    },
    /// Set the warm-white channel brightness
    Warm {
        /// Brightness level, 1 to 10
        level: u8,
    },
    /// Set both channels to the same brightness
    Dual {
        /// Brightness level, 1 to 10
        level: u8,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .init();

    let radio = hci::HciRadio::open(cli.device).map_err(|e| {
        format!(
            "failed to open hci{} (is Bluetooth available, and do you have CAP_NET_RAW?): {e}",
            cli.device
        )
    })?;
    let mut lamp = lamp::Lamp::new(cli.name, radio);

    match cli.command {
        Commands::Setup => lamp.setup()?,
        Commands::On => lamp.on()?,
        Commands::Off => lamp.off()?,
        Commands::Cold { level } => lamp.cold(level)?,
        Commands::Warm { level } => lamp.warm(level)?,
        Commands::Dual { level } => lamp.dual(level)?,
    }

    Ok(())
}
