use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use snowgen::{DEFAULT_EPOCH, SnowflakeId, WorkerId};

/// Runtime configuration for the `snowgen` binary.
///
/// Every generation setting can be given as a flag or an environment variable
/// (a `.env` file is loaded first). The worker ID has no default: running two
/// nodes with the same worker ID would produce colliding IDs.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowgen",
    version,
    about = "Issue and decode coordination-free 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Issue new IDs and print them, one per line.
    Generate(GenerateArgs),
    /// Split existing IDs into timestamp, worker ID and sequence.
    Decode(DecodeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Worker ID of this node, in `0..=1023`.
    ///
    /// Must be unique among every node whose IDs share a namespace.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", allow_negative_numbers = true)]
    pub worker_id: i64,

    /// Number of IDs to issue.
    ///
    /// Environment variable: `ID_COUNT`
    #[arg(short, long, env = "ID_COUNT", default_value_t = 10)]
    pub count: usize,

    /// Number of threads sharing the generator.
    ///
    /// Environment variable: `ID_THREADS`
    #[arg(short, long, env = "ID_THREADS", default_value_t = 1)]
    pub threads: usize,

    /// How many milliseconds the clock may step backward before generation
    /// fails instead of waiting.
    ///
    /// Environment variable: `CLOCK_TOLERANCE_MS`
    #[arg(long, env = "CLOCK_TOLERANCE_MS", default_value_t = 0)]
    pub tolerance_ms: u64,

    /// Print IDs zero-padded to 20 digits so they sort lexicographically.
    #[arg(short, long, default_value_t = false)]
    pub padded: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// IDs to decode (decimal).
    #[arg(required = true, allow_negative_numbers = true)]
    pub ids: Vec<String>,

    /// Epoch the IDs were generated against, in ms since 1970-01-01 UTC.
    ///
    /// Environment variable: `SNOWGEN_EPOCH_MS`
    #[arg(long, env = "SNOWGEN_EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Config {
    Generate(GenerateConfig),
    Decode(DecodeConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub worker_id: WorkerId,
    pub count: usize,
    pub threads: usize,
    pub clock_tolerance: u64,
    pub padded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    pub ids: Vec<SnowflakeId>,
    pub epoch: Duration,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        match args.command {
            Command::Generate(args) => GenerateConfig::try_from(args).map(Self::Generate),
            Command::Decode(args) => DecodeConfig::try_from(args).map(Self::Decode),
        }
    }
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        let worker_id = WorkerId::try_from(args.worker_id).context("WORKER_ID is invalid")?;

        let max_threads = num_cpus::get() * 4;
        if args.threads == 0 {
            bail!("ID_THREADS must be greater than 0");
        }
        if args.threads > max_threads {
            bail!(
                "ID_THREADS ({}) exceeds {} (4 per available CPU)",
                args.threads,
                max_threads
            );
        }

        Ok(Self {
            worker_id,
            count: args.count,
            threads: args.threads,
            clock_tolerance: args.tolerance_ms,
            padded: args.padded,
        })
    }
}

impl TryFrom<DecodeArgs> for DecodeConfig {
    type Error = anyhow::Error;

    fn try_from(args: DecodeArgs) -> Result<Self, Self::Error> {
        let ids = args
            .ids
            .iter()
            .map(|raw| {
                raw.parse::<SnowflakeId>()
                    .with_context(|| format!("cannot decode `{raw}`"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        if args.epoch_ms.checked_add(SnowflakeId::max_timestamp()).is_none() {
            bail!(
                "SNOWGEN_EPOCH_MS ({}) is too large: must be at most {}",
                args.epoch_ms,
                u64::MAX - SnowflakeId::max_timestamp()
            );
        }

        Ok(Self {
            ids,
            epoch: Duration::from_millis(args.epoch_ms),
        })
    }
}
