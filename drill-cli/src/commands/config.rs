//! `drill config` - show the effective session configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use drill_core::SessionConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Path to a session config TOML file (defaults to the reference config)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::reference(),
    };
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
