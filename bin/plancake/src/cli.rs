use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use plancake_deploy::{Address, Amount, DEFAULT_SENDER};
use tracing::level_filters::LevelFilter;

/// The network selected when none is given, matching the usual local-chain name.
const DEFAULT_NETWORK: &str = "development";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "plancake")]
#[command(
    author,
    version,
    about = "Deploy contracts in order, passing each deployed address to the steps that need it"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, global = true, env = "PLANCAKE_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that a plan is well formed for the target network, without deploying anything.
    Validate(ValidateArgs),
    /// Run a plan against a simulated chain and print the addresses it would produce.
    Simulate(SimulateArgs),
}

/// Which plan to load and for which network.
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Path to a plan file, or to a directory containing `Deploy.toml`.
    #[arg(env = "PLANCAKE_PLAN", default_value = ".")]
    pub plan: PathBuf,

    /// The target network. Steps restricted to other networks are skipped.
    #[arg(short, long, env = "PLANCAKE_NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// The account deploying the contracts. Determines the predicted addresses.
    #[arg(long, env = "PLANCAKE_SENDER", default_value_t = DEFAULT_SENDER)]
    pub sender: Address,

    /// The sender's nonce before the first deployment.
    #[arg(long, env = "PLANCAKE_NONCE", default_value_t = 0)]
    pub nonce: u64,

    /// The sender's balance, e.g. `10 ether`. Unlimited when not set.
    #[arg(long, env = "PLANCAKE_BALANCE")]
    pub balance: Option<Amount>,

    /// Directory of compiled artifacts. When set, `<dir>/<Contract>.json` must exist
    /// for every deployed contract.
    #[arg(long, env = "PLANCAKE_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// How to print the deployed addresses.
    #[arg(long, env = "PLANCAKE_FORMAT", default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_defaults() {
        let cli = Cli::try_parse_from(["plancake", "simulate", "plans/azbit.toml"]).unwrap();

        let Command::Simulate(args) = cli.command else {
            panic!("expected the simulate command");
        };
        assert_eq!(args.plan.plan, PathBuf::from("plans/azbit.toml"));
        assert_eq!(args.plan.network, "development");
        assert_eq!(args.sender, DEFAULT_SENDER);
        assert_eq!(args.nonce, 0);
        assert_eq!(args.balance, None);
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(cli.verbosity, LevelFilter::INFO);
    }

    #[test]
    fn test_simulate_overrides() {
        let cli = Cli::try_parse_from([
            "plancake",
            "simulate",
            "plans",
            "--network",
            "mainnet",
            "--nonce",
            "7",
            "--balance",
            "2 ether",
            "--format",
            "json",
            "-v",
            "debug",
        ])
        .unwrap();

        let Command::Simulate(args) = cli.command else {
            panic!("expected the simulate command");
        };
        assert_eq!(args.plan.network, "mainnet");
        assert_eq!(args.nonce, 7);
        assert_eq!(args.balance, Some("2 ether".parse().unwrap()));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(cli.verbosity, LevelFilter::DEBUG);
    }

    #[test]
    fn test_rejects_bad_balance() {
        let result =
            Cli::try_parse_from(["plancake", "simulate", "plans", "--balance", "2 finney"]);
        assert!(result.is_err());
    }
}
