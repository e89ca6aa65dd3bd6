use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use notetest_proto::Encoder;

/// Plays single notes on the floppy drive controller, one at a time
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct NotetestArgs {
    /// Path to a TOML driver configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Velocity sent with every note (overrides the config file)
    #[arg(long)]
    pub velocity: Option<u8>,

    /// Channel the notes are sent on (overrides the config file)
    #[arg(long)]
    pub channel: Option<u8>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct DriverConfig {
    /// Velocity and channel of the generated frames
    #[serde(default)]
    pub encoder: Encoder,
}

pub fn parse_driver_config(args: &NotetestArgs) -> Result<DriverConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "driver configuration file `{}` does not exist",
                    path.display()
                ));
            }

            let config_file = std::fs::read_to_string(path)
                .with_context(|| format!("could not read file `{}`", path.display()))?;

            toml::from_str(&config_file)
                .with_context(|| format!("could not parse file `{}`", path.display()))?
        }
        None => DriverConfig::default(),
    };

    if let Some(velocity) = args.velocity {
        config.encoder.velocity = velocity;
    }

    if let Some(channel) = args.channel {
        config.encoder.channel = channel;
    }

    Ok(config)
}
