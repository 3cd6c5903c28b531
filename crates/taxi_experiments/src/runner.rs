//! Parallel simulation execution using rayon.
//!
//! Each run builds its own world from a [`ParameterSet`], so runs share no
//! state and can execute on any worker thread.

use bevy_ecs::prelude::World;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use taxi_core::runner::{run_until_end, simulation_schedule};
use taxi_core::scenario::build_scenario;
use tracing::{debug, info};

use crate::error::ExperimentError;
use crate::metrics::{extract_metrics, SimulationResult};
use crate::parameters::ParameterSet;

/// Run a single simulation with the given parameter set.
///
/// Builds a fresh world, runs it for `param_set.days` simulated days and
/// extracts metrics from the result.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, ExperimentError> {
    let mut world = World::new();
    build_scenario(&mut world, param_set.scenario_params())?;

    let mut schedule = simulation_schedule();
    let ticks = run_until_end(&mut world, &mut schedule, param_set.total_ticks());
    debug!(
        experiment_id = %param_set.experiment_id,
        run_id = param_set.run_id,
        ticks,
        "simulation finished"
    );

    extract_metrics(&mut world)
}

/// Run multiple simulations in parallel.
///
/// Results come back in the same order as `parameter_sets`. `num_threads`
/// of `None` uses rayon's default pool size.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel with an optional progress bar.
///
/// The first failing run aborts the sweep with its error.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    let total = parameter_sets.len();
    let pb = (show_progress && total > 0).then(|| {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    });

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    info!(runs = total, threads = pool.current_num_threads(), "starting experiments");

    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Some(progress_bar) = &pb {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(progress_bar) = &pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}
