use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use snowid::{GeneratorConfig, MachineId};

/// Command-line arguments for the `snowid` binary.
///
/// Global options fall back to environment variables (a `.env` file in the
/// working directory is loaded first), so a deployment can pin its epoch and
/// machine ID once and call the binary without flags.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowid",
    version,
    about = "Generate and decode time-sortable 64-bit IDs"
)]
pub struct CliArgs {
    /// Epoch in milliseconds since the Unix epoch.
    ///
    /// Every tool that decodes these IDs must use the same value.
    ///
    /// Environment variable: `SNOWID_EPOCH`
    #[arg(long, env = "SNOWID_EPOCH", global = true, allow_negative_numbers = true)]
    pub epoch: Option<i64>,

    /// Machine ID in `0..=4095` encoded into generated IDs.
    ///
    /// A random ID is drawn when omitted.
    ///
    /// Environment variable: `SNOWID_MACHINE_ID`
    #[arg(long, env = "SNOWID_MACHINE_ID", global = true, allow_hyphen_values = true)]
    pub machine_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate new IDs, one per line.
    Generate {
        /// Number of IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Print the timestamp, machine ID and sequence of each ID.
    Decode {
        /// IDs in base-10.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the smallest ID this machine could issue at a Unix millisecond
    /// timestamp.
    At {
        /// Unix timestamp in milliseconds.
        #[arg(allow_hyphen_values = true)]
        timestamp: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Decode { .. } => "decode",
            Self::At { .. } => "at",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub generator: GeneratorConfig,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let mut generator = GeneratorConfig::default();

        if let Some(epoch) = args.epoch {
            generator = generator.with_epoch(epoch);
        }

        if let Some(raw) = args.machine_id.as_deref() {
            let machine_id: MachineId = raw
                .parse()
                .with_context(|| format!("SNOWID_MACHINE_ID `{raw}` is not usable"))?;
            generator = generator.with_machine_id(i64::from(machine_id.get()));
        }

        if let Command::Generate { count: 0 } = args.command {
            bail!("--count must be greater than 0");
        }

        Ok(Self {
            generator,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowid::{DEFAULT_EPOCH, Error};

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let args = CliArgs::try_parse_from(args)?;
        CliConfig::try_from(args)
    }

    #[test]
    fn generate_defaults() {
        let config = parse(&["snowid", "generate"]).unwrap();
        assert_eq!(config.command, Command::Generate { count: 1 });
        assert_eq!(config.generator.epoch_or_default(), DEFAULT_EPOCH);
    }

    #[test]
    fn global_options_after_subcommand() {
        let config = parse(&[
            "snowid",
            "generate",
            "--count",
            "3",
            "--epoch",
            "0",
            "--machine-id",
            "4095",
        ])
        .unwrap();
        assert_eq!(config.command, Command::Generate { count: 3 });
        assert_eq!(config.generator.epoch, Some(0));
        assert_eq!(config.generator.machine_id, Some(4095));
    }

    #[test]
    fn rejects_bad_machine_ids() {
        for raw in ["4096", "-1"] {
            let err = parse(&["snowid", "--machine-id", raw, "generate"]).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::MachineIdOutOfRange { .. })
            ));
        }
        for raw in ["3.5", "seven"] {
            let err = parse(&["snowid", "--machine-id", raw, "generate"]).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::InvalidMachineId { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_count() {
        assert!(parse(&["snowid", "generate", "-n", "0"]).is_err());
    }

    #[test]
    fn decode_requires_ids() {
        assert!(parse(&["snowid", "decode"]).is_err());
        let config = parse(&["snowid", "decode", "1", "2"]).unwrap();
        assert_eq!(
            config.command,
            Command::Decode {
                ids: vec!["1".to_owned(), "2".to_owned()]
            }
        );
    }

    #[test]
    fn at_takes_one_timestamp() {
        let config = parse(&["snowid", "at", "1546300800123"]).unwrap();
        assert_eq!(
            config.command,
            Command::At {
                timestamp: "1546300800123".to_owned()
            }
        );
    }
}
