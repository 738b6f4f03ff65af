//! Bugbench command-line driver.
//!
//! Runs a single bug, a head-to-head comparison, or a marathon of random
//! trials, writing JSON to stdout. Logs go to stderr and are filtered with
//! `RUST_LOG`.
//!
//! Usage:
//!   bugbench single   [--bug bug1|bug2] [--seed N] [--config FILE]
//!   bugbench compare  [--bug KIND] [--rival KIND] [--seed N]
//!   bugbench marathon [--trials N] [--bug KIND] [--rival KIND] [--threads N]
//!                     [--step-cap N] [--stall-limit N] [--output FILE.jsonl]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use tracing::info;

use bugbench::bug::{Bug, BugKind};
use bugbench::marathon::{
    kind_factory, run_marathon_with_callback, ConfigError, MarathonConfig, MarathonError,
    PolicyFactory,
};
use bugbench::scenario::{generate_scenario, Scenario, ScenarioError};
use bugbench::simulation::{CompareSimulator, Simulator};
use bugbench::stats::BugStats;

#[derive(Debug, Parser)]
#[command(name = "bugbench", version, about = "Benchmark bug navigation against BFS-optimal paths")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one bug on a random map.
    Single {
        #[arg(long, default_value = "bug2")]
        bug: BugKind,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Run two bugs side by side on the same random map.
    Compare {
        #[arg(long, default_value = "bug2")]
        bug: BugKind,
        #[arg(long, default_value = "bug1")]
        rival: BugKind,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Run a batch of random trials and report aggregate statistics.
    Marathon {
        #[arg(long)]
        trials: Option<usize>,
        #[arg(long, default_value = "bug2")]
        bug: BugKind,
        /// Race against this bug on every trial.
        #[arg(long)]
        rival: Option<BugKind>,
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long)]
        stall_limit: Option<usize>,
        /// Write one JSON line per trial to this file.
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Random seed, 0 for entropy.
    #[arg(long)]
    seed: Option<u64>,
    /// Tick cap per run.
    #[arg(long)]
    step_cap: Option<usize>,
    /// JSON config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Marathon(#[from] MarathonError),
    #[error("output error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Single { bug, common } => {
            let config = load_config(&common)?;
            let (seed, scenario) = scenario_for(&config)?;
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut sim = Simulator::new(spawn(bug, &scenario, &mut rng));
            let ticks = sim.run_to_end(config.step_cap);
            let report = json!({
                "seed": seed,
                "scenario": scenario_json(&scenario),
                "ticks": ticks,
                "bugs": [bug_json(sim.bug(), scenario.optimal_len())],
            });
            print_json(&report)
        }
        Command::Compare { bug, rival, common } => {
            let config = load_config(&common)?;
            let (seed, scenario) = scenario_for(&config)?;
            let mut rng = SmallRng::seed_from_u64(seed);
            let first = spawn(bug, &scenario, &mut rng);
            let second = spawn(rival, &scenario, &mut rng);
            let mut sim = CompareSimulator::new(first, second);
            let ticks = sim.run_to_end(config.step_cap);
            let optimal = scenario.optimal_len();
            let report = json!({
                "seed": seed,
                "scenario": scenario_json(&scenario),
                "ticks": ticks,
                "bugs": [bug_json(sim.first(), optimal), bug_json(sim.second(), optimal)],
            });
            print_json(&report)
        }
        Command::Marathon {
            trials,
            bug,
            rival,
            threads,
            stall_limit,
            output,
            common,
        } => {
            let mut config = load_config(&common)?;
            if let Some(trials) = trials {
                config.trials = trials;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if stall_limit.is_some() {
                config.stall_limit = stall_limit;
            }
            config.seed = config.resolved_seed();
            run_marathon_cmd(&config, bug, rival, output)
        }
    }
}

fn run_marathon_cmd(
    config: &MarathonConfig,
    bug: BugKind,
    rival: Option<BugKind>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let bug_factory = kind_factory(bug);
    let rival_factory = rival.map(kind_factory);
    let rival_ref = rival_factory.as_ref().map(|f| f as &PolicyFactory);

    let mut writer = match &output {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };
    let mut write_error: Option<CliError> = None;

    let result = run_marathon_with_callback(config, &bug_factory, rival_ref, |trial| {
        if write_error.is_some() {
            return;
        }
        if let Some(out) = writer.as_mut() {
            let line = serde_json::to_writer(&mut *out, trial)
                .map_err(CliError::from)
                .and_then(|()| writeln!(out).map_err(CliError::from));
            if let Err(e) = line {
                write_error = Some(e);
            }
        }
    })?;

    if let Some(e) = write_error {
        return Err(e);
    }
    if let Some(mut out) = writer {
        out.flush()?;
        if let Some(path) = &output {
            info!(path = %path.display(), trials = result.total_trials, "wrote trial records");
        }
    }

    let report = json!({
        "seed": config.seed,
        "bug": bug,
        "rival": rival,
        "result": result,
        "average_steps": result.average_steps(),
        "average_optimal": result.average_optimal(),
        "efficiency": result.efficiency(),
        "completion_rate": result.completion_rate(),
    });
    print_json(&report)
}

fn load_config(common: &CommonArgs) -> Result<MarathonConfig, CliError> {
    let mut config = match &common.config {
        Some(path) => MarathonConfig::from_json_file(path)?,
        None => MarathonConfig::default(),
    };
    if let Some(seed) = common.seed {
        config.seed = seed;
    }
    if let Some(step_cap) = common.step_cap {
        config.step_cap = step_cap;
    }
    config.validate()?;
    Ok(config)
}

/// Resolves the seed (drawing one when it is 0) and builds the scenario.
fn scenario_for(config: &MarathonConfig) -> Result<(u64, Scenario), CliError> {
    let seed = config.resolved_seed();
    info!(seed, "generating scenario");
    let mut rng = SmallRng::seed_from_u64(seed);
    let scenario = generate_scenario(&config.scenario, &mut rng)?;
    Ok((seed, scenario))
}

fn spawn(kind: BugKind, scenario: &Scenario, rng: &mut SmallRng) -> Bug {
    Bug::new(
        kind.make_policy(rng),
        scenario.grid.clone(),
        scenario.start,
        scenario.goal,
    )
}

fn scenario_json(scenario: &Scenario) -> serde_json::Value {
    json!({
        "width": scenario.grid.width(),
        "height": scenario.grid.height(),
        "obstacles": scenario.grid.obstacle_count(),
        "start": scenario.start,
        "goal": scenario.goal,
        "optimal_len": scenario.optimal_len(),
    })
}

fn bug_json(bug: &Bug, optimal_len: usize) -> serde_json::Value {
    json!({
        "kind": bug.kind(),
        "position": bug.current_position(),
        "stats": BugStats::from_bug(bug, optimal_len),
    })
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
