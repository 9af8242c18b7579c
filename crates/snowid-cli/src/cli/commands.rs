use std::io::Write;

use anyhow::Context;
use snowid::{Sequencer, TimeSource, UniqueIdGenerator};

use super::config::{CliConfig, Command};

/// Builds a wall-clock generator from `config` and runs its command, writing
/// results to `out`.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = UniqueIdGenerator::new(&config.generator)?;
    tracing::debug!(machine_id = %generator.machine_id(), "generator ready");
    execute(&generator, &config.command, out)
}

pub fn execute<S, T>(
    generator: &UniqueIdGenerator<S, T>,
    command: &Command,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    S: Sequencer,
    T: TimeSource,
{
    match command {
        Command::Generate { count } => {
            for _ in 0..*count {
                writeln!(out, "{}", generator.generate_value()?)?;
            }
        }
        Command::Decode { ids } => {
            for raw in ids {
                let id = raw.as_str();
                let timestamp = generator.decode_timestamp(id)?;
                let machine_id = generator.decode_machine_id(id)?;
                let sequence = generator.decode_sequence(id)?;
                writeln!(out, "{id}\t{timestamp}\t{machine_id}\t{sequence}")?;
            }
        }
        Command::At { timestamp } => {
            let id = generator
                .generate_for_timestamp(timestamp.as_str())
                .with_context(|| format!("cannot build an ID for `{timestamp}`"))?;
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}
