//! Pickup CLI
//!
//! Splits a roster file into two teams, or prints a squad preset.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use pickup_core::{SquadConfig, Strategy};
#[cfg(feature = "cli")]
use pickup_cli::{logging, run_split, SplitOptions, SplitOutcome};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "pickup")]
#[command(about = "Split a pickup match roster into two teams", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Split a roster file into two teams
    Split {
        /// Roster JSON file (players plus optional anchorages)
        #[arg(long)]
        roster: PathBuf,

        /// Squad config JSON file (defaults to $PICKUP_CONFIG_PATH, then five-a-side)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "random")]
        strategy: StrategyArg,

        /// Seed for a reproducible split
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a preset squad config as JSON
    Preset {
        #[arg(value_enum)]
        name: PresetArg,
    },
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Random,
    Balanced,
}

#[cfg(feature = "cli")]
impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Random => Strategy::Random,
            StrategyArg::Balanced => Strategy::Balanced,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Five,
    Seven,
    Eight,
    Eleven,
}

#[cfg(feature = "cli")]
impl PresetArg {
    fn config(self) -> SquadConfig {
        match self {
            PresetArg::Five => SquadConfig::five_a_side(),
            PresetArg::Seven => SquadConfig::seven_a_side(),
            PresetArg::Eight => SquadConfig::eight_a_side(),
            PresetArg::Eleven => SquadConfig::eleven_a_side(),
        }
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Commands::Split { roster, config, strategy, seed, json } => {
            let options = SplitOptions { roster, config, strategy: strategy.into(), seed };
            let outcome = run_split(&options)?;

            if json {
                println!("{}", outcome.report.to_json_pretty()?);
            } else {
                print_outcome(&outcome);
            }
        }

        Commands::Preset { name } => {
            let json = serde_json::to_string_pretty(&name.config())
                .context("Failed to serialise preset")?;
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_outcome(outcome: &SplitOutcome) {
    for rejection in &outcome.rejections {
        println!("Rejected [{}]: {}", rejection.request.join(", "), rejection.reason);
    }
    if !outcome.rejections.is_empty() {
        println!();
    }

    for anchorage in &outcome.anchorages {
        print!("{}", anchorage);
    }
    if !outcome.anchorages.is_empty() {
        println!();
    }

    println!("{}", outcome.report);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("pickup CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
