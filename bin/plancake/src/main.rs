//! plancake is a CLI tool to deploy a set of contracts in a fixed order, threading the
//! address of each deployed contract into the constructors that need it.

mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;

use cli::{Cli, Command, OutputFormat, PlanArgs, SimulateArgs, ValidateArgs};
use plancake_deploy::{DeploymentPlan, DryRunDeployer, PlanFingerprint, Sequencer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Validate(args) => validate(args),
        Command::Simulate(args) => simulate(args).await,
    }
}

/// Load the plan file and keep the steps targeting the selected network.
fn load_plan(args: &PlanArgs) -> Result<DeploymentPlan> {
    let plan = DeploymentPlan::load_from_file(&args.plan)?;

    plan.for_network(&args.network)
        .context(format!("Plan is not valid for network `{}`", args.network))
}

fn validate(args: ValidateArgs) -> Result<()> {
    let plan = load_plan(&args.plan)?;
    let fingerprint = PlanFingerprint::of(&plan);

    println!("{}", output::plan_table(&plan));
    println!("Fingerprint: {fingerprint}");

    tracing::info!(
        network = %args.plan.network,
        steps = plan.len(),
        fingerprint = %fingerprint.short(),
        "Plan is valid"
    );

    Ok(())
}

async fn simulate(args: SimulateArgs) -> Result<()> {
    let plan = load_plan(&args.plan)?;

    let mut deployer = DryRunDeployer::new(args.sender).nonce(args.nonce);
    if let Some(balance) = args.balance {
        deployer = deployer.balance(balance);
    }
    if let Some(dir) = args.artifacts {
        deployer = deployer.artifacts_dir(dir);
    }

    tracing::info!(
        network = %args.plan.network,
        sender = %args.sender,
        nonce = args.nonce,
        "Simulating deployment (no transactions are sent)..."
    );

    // Ctrl+C lets the current step finish, then stops.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Ctrl+C received, stopping after the current step");
            let _ = stop_tx.send(true);
        }
    });

    let mut sequencer = Sequencer::new(deployer).with_stop_signal(stop_rx);
    let outcome = sequencer.execute(&plan).await;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output::outcome_json(&outcome))
                .context("Failed to serialize run outcome")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let deployed = match &outcome {
                Ok(result) => Some(result),
                Err(err) => err.completed(),
            };
            if let Some(deployed) = deployed.filter(|d| !d.is_empty()) {
                println!("{}", output::result_table(&plan, deployed));
            }
        }
    }

    tracing::info!(state = %sequencer.state(), "Run finished");

    outcome
        .map(|_| ())
        .context(format!("Simulation of {} failed", args.plan.plan.display()))
}
