//! Marathon mode: batched random trials.
//!
//! Each trial generates a fresh scenario, runs one bug (or two, in compare
//! mode) to completion or the step cap, and folds the outcome into a
//! [`MarathonResult`]. Trial `i` draws all of its randomness from an RNG
//! seeded with `seed + i`, so a seeded marathon gives the same totals whether
//! it runs sequentially or on a thread pool.

pub mod config;
pub mod result;

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::bug::{Bug, BugKind, Policy};
use crate::scenario::{generate_scenario, ScenarioError};

pub use config::{ConfigError, MarathonConfig};
pub use result::{BugRun, MarathonResult, TrialOutcome, TrialRecord};

/// Builds a fresh move policy for a trial from the trial's RNG.
pub type PolicyFactory = dyn Fn(&mut SmallRng) -> Policy + Send + Sync;

/// Errors that abort a marathon.
#[derive(Debug, thiserror::Error)]
pub enum MarathonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("marathon worker thread panicked")]
    WorkerPanicked,
}

/// Returns a factory producing policies of `kind`.
pub fn kind_factory(kind: BugKind) -> impl Fn(&mut SmallRng) -> Policy + Send + Sync {
    move |rng: &mut SmallRng| kind.make_policy(rng)
}

/// Runs `config.trials` trials of `bug`, racing it against `rival` on the
/// same scenario when one is given.
pub fn run_marathon(
    config: &MarathonConfig,
    bug: &PolicyFactory,
    rival: Option<&PolicyFactory>,
) -> Result<MarathonResult, MarathonError> {
    run_marathon_with_callback(config, bug, rival, |_| {})
}

/// Like [`run_marathon`], calling `on_trial` on the calling thread with each
/// completed trial. With more than one thread, trials arrive in completion
/// order rather than by id.
pub fn run_marathon_with_callback<F>(
    config: &MarathonConfig,
    bug: &PolicyFactory,
    rival: Option<&PolicyFactory>,
    on_trial: F,
) -> Result<MarathonResult, MarathonError>
where
    F: FnMut(&TrialRecord),
{
    config.validate()?;

    let base_seed = config.resolved_seed();
    info!(
        trials = config.trials,
        threads = config.threads,
        seed = base_seed,
        compare = rival.is_some(),
        "starting marathon"
    );

    let started = Instant::now();
    let result = if config.threads > 1 {
        run_parallel(config, base_seed, bug, rival, on_trial)?
    } else {
        run_sequential(config, base_seed, bug, rival, on_trial)?
    };

    info!(
        completed = result.completed,
        gave_up = result.gave_up,
        terminated = result.terminated,
        efficiency = result.efficiency(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "marathon finished"
    );
    Ok(result)
}

fn trial_rng(base_seed: u64, trial_id: usize) -> SmallRng {
    SmallRng::seed_from_u64(base_seed.wrapping_add(trial_id as u64))
}

fn run_sequential<F>(
    config: &MarathonConfig,
    base_seed: u64,
    bug: &PolicyFactory,
    rival: Option<&PolicyFactory>,
    mut on_trial: F,
) -> Result<MarathonResult, MarathonError>
where
    F: FnMut(&TrialRecord),
{
    let mut result = MarathonResult::new();
    for i in 0..config.trials {
        let mut rng = trial_rng(base_seed, i);
        let record = run_trial(config, i, &mut rng, bug, rival)?;
        on_trial(&record);
        result.record(&record);
    }
    Ok(result)
}

/// Runs trials on a rayon pool. Workers send records over a channel; the
/// calling thread is the only one that touches the result.
fn run_parallel<F>(
    config: &MarathonConfig,
    base_seed: u64,
    bug: &PolicyFactory,
    rival: Option<&PolicyFactory>,
    mut on_trial: F,
) -> Result<MarathonResult, MarathonError>
where
    F: FnMut(&TrialRecord),
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let (tx, rx) = mpsc::channel::<Result<TrialRecord, ScenarioError>>();

    std::thread::scope(|scope| {
        let worker = scope.spawn(move || {
            pool.install(|| {
                (0..config.trials)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let mut rng = trial_rng(base_seed, i);
                        let _ = tx.send(run_trial(config, i, &mut rng, bug, rival));
                    });
            });
        });

        let mut result = MarathonResult::new();
        let mut first_error = None;
        for record in rx {
            match record {
                Ok(record) => {
                    on_trial(&record);
                    result.record(&record);
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if worker.join().is_err() {
            return Err(MarathonError::WorkerPanicked);
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(result),
        }
    })
}

/// A bug plus the runner's bookkeeping for it.
struct Lane {
    bug: Bug,
    ticks: usize,
    stalled: usize,
}

impl Lane {
    fn new(bug: Bug) -> Self {
        Lane {
            bug,
            ticks: 0,
            stalled: 0,
        }
    }

    fn tick(&mut self, stall_limit: Option<usize>) {
        if self.bug.is_done() {
            return;
        }
        let before = self.bug.path_len();
        self.bug.next_step();
        self.ticks += 1;

        if self.bug.path_len() > before || self.bug.has_finished() {
            self.stalled = 0;
            return;
        }
        self.stalled += 1;
        if stall_limit.is_some_and(|limit| self.stalled >= limit) {
            self.bug.give_up();
        }
    }

    fn run(&self) -> BugRun {
        BugRun::from_bug(&self.bug, self.ticks)
    }
}

/// Plays one trial: scenario generation, stepping to completion or the cap.
pub fn run_trial(
    config: &MarathonConfig,
    trial_id: usize,
    rng: &mut SmallRng,
    bug: &PolicyFactory,
    rival: Option<&PolicyFactory>,
) -> Result<TrialRecord, ScenarioError> {
    let scenario = generate_scenario(&config.scenario, rng)?;

    let spawn = |policy: Policy| {
        Lane::new(Bug::new(
            policy,
            Arc::clone(&scenario.grid),
            scenario.start,
            scenario.goal,
        ))
    };
    let mut primary = spawn(bug(&mut *rng));
    let mut second = rival.map(|factory| spawn(factory(&mut *rng)));

    for _ in 0..config.step_cap {
        primary.tick(config.stall_limit);
        if let Some(lane) = second.as_mut() {
            lane.tick(config.stall_limit);
        }
        let second_done = second.as_ref().map_or(true, |lane| lane.bug.is_done());
        if primary.bug.is_done() && second_done {
            break;
        }
    }

    let record = TrialRecord {
        trial_id,
        width: scenario.grid.width(),
        height: scenario.grid.height(),
        start: scenario.start,
        goal: scenario.goal,
        optimal_len: scenario.optimal_len(),
        bug: primary.run(),
        rival: second.as_ref().map(Lane::run),
    };
    debug!(
        trial = trial_id,
        outcome = ?record.bug.outcome,
        path_len = record.bug.path_len,
        optimal_len = record.optimal_len,
        "trial finished"
    );
    Ok(record)
}
