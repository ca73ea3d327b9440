//! Command line driver for the grid simulation and the storefront demo.

mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gridsim_core::{NeighborPolicy, RunnerConfig, ScenarioConfig};
use gridsim_store::Storefront;
use gridsim_world::{Scenario, TracingSink};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "gridsim")]
#[command(about = "Grid entity simulation and storefront demo")]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the grid simulation
    Simulate(SimulateArgs),
    /// Run the storefront demo
    StoreDemo,
}

#[derive(clap::Args, Debug, Default)]
struct SimulateArgs {
    /// Scenario file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid size
    #[arg(long)]
    size: Option<i32>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Which neighbor cells entities see
    #[arg(long, value_enum)]
    neighbor_policy: Option<NeighborPolicyArg>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum NeighborPolicyArg {
    OccupiedOnly,
    IncludeVacant,
}

impl From<NeighborPolicyArg> for NeighborPolicy {
    fn from(arg: NeighborPolicyArg) -> Self {
        match arg {
            NeighborPolicyArg::OccupiedOnly => NeighborPolicy::OccupiedOnly,
            NeighborPolicyArg::IncludeVacant => NeighborPolicy::IncludeVacant,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut runner_config = RunnerConfig {
        log_json: args.log_json,
        ..Default::default()
    };
    if let Some(filter) = args.log_filter {
        runner_config.log_filter = filter;
    }
    telemetry::init_telemetry(&runner_config)?;

    match args.command.unwrap_or(Command::Simulate(SimulateArgs::default())) {
        Command::Simulate(sim_args) => simulate(sim_args),
        Command::StoreDemo => store_demo(),
    }
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ScenarioConfig::from_json_file(path)
            .with_context(|| format!("failed to load scenario from {}", path.display()))?,
        None => ScenarioConfig::default(),
    };

    if let Some(size) = args.size {
        config.world.size = size;
    }
    if let Some(ticks) = args.ticks {
        config.num_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(policy) = args.neighbor_policy {
        config.world.neighbor_policy = policy.into();
    }

    info!(
        size = config.world.size,
        ticks = config.num_ticks,
        seed = config.seed,
        "Starting grid simulation"
    );

    let scenario = Scenario::new(config)?;
    let (result, _) = scenario.execute(TracingSink)?;

    info!("Simulation completed.");

    if args.summary {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

fn store_demo() -> Result<()> {
    let mut store = Storefront::default();

    match store.run_demo()? {
        Some(order) => {
            let order_json = serde_json::to_string(&order)?;
            info!(order = %order_json, "Created Order");
        }
        None => {
            warn!("Invalid Credentials");
        }
    }

    Ok(())
}
