#![doc = include_str!("../README.md")]

mod cli;

use std::io::{BufWriter, Write};

use clap::Parser;
use cli::commands::run;
use cli::config::{CliArgs, CliConfig};
use cli::telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    init_telemetry()?;

    let config = CliConfig::try_from(args).inspect_err(|e| tracing::error!("{e:#}"))?;
    log_startup_info(&config);

    let mut out = BufWriter::new(std::io::stdout().lock());
    run(&config, &mut out).inspect_err(|e| tracing::error!("{e:#}"))?;
    out.flush()?;
    Ok(())
}

fn log_startup_info(config: &CliConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Running with full config: {:#?}", config);
    } else {
        tracing::debug!(
            "Running `{}` with epoch {}",
            config.command.name(),
            config.generator.epoch_or_default()
        );
    }
}
