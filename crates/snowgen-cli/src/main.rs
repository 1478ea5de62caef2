#![doc = include_str!("../README.md")]

mod config;
mod run;
mod telemetry;

use clap::Parser;
use config::{CliArgs, Config};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    telemetry::init_telemetry()?;

    let stdout = std::io::stdout();
    run::run(&config, &mut stdout.lock())
}
