//! Example: fleet controller sweep.
//!
//! Varies the initial fleet, the wait thresholds and the matching policy,
//! runs every combination over several seeds in parallel, reports the best
//! configuration and exports all results.
//!
//! Run with `RUST_LOG=info cargo run -p taxi_experiments --example parameter_sweep`.

use taxi_core::scenario::{MatchingAlgorithmType, ScenarioParams};
use taxi_experiments::{
    export_to_csv, export_to_json, find_best_parameters, find_best_result_index,
    run_parallel_experiments, ExperimentError, ParameterSpace,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ExperimentError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let base = ScenarioParams::default()
        .with_grid(60, 60)
        .with_population(20, 300)
        .with_fleet_bounds(5, 60)
        .with_ticks_per_day(480);

    let space = ParameterSpace::grid()
        .with_base(base)
        .initial_taxis(vec![10, 20, 40])
        .lower_wait_threshold(vec![5.0, 10.0])
        .upper_wait_threshold(vec![30.0, 60.0])
        .matching_algorithm(vec![
            MatchingAlgorithmType::Nearest,
            MatchingAlgorithmType::FirstIdle,
        ])
        .seeds(vec![1, 2])
        .days(vec![5]);

    let parameter_sets = space.generate();
    println!("Generated {} parameter sets", parameter_sets.len());

    let results = run_parallel_experiments(parameter_sets.clone(), None)?;
    println!("Completed {} simulations", results.len());

    if let Some(best_idx) = find_best_result_index(&results) {
        let best = &results[best_idx];
        println!("\n=== Best Run ===");
        println!("Average assignment wait: {:.1} ticks", best.avg_assignment_wait);
        println!("P90 assignment wait: {:.1} ticks", best.p90_assignment_wait);
        println!("Average time to pickup: {:.1} ticks", best.avg_time_to_pickup);
        println!(
            "Fleet: final {} (min {}, peak {}), {} changes",
            best.final_fleet_size, best.min_fleet_size, best.peak_fleet_size, best.fleet_changes
        );
        println!(
            "Rides: {} completed, {} cancelled, {} visits",
            best.completed_rides, best.cancelled_requests, best.total_visits
        );
    }

    if let Some(best_params) = find_best_parameters(&results, &parameter_sets) {
        let params = &best_params.params;
        println!("\n=== Best Parameters ===");
        println!("Experiment: {} (run {})", best_params.experiment_id, best_params.run_id);
        println!("Initial taxis: {}", params.initial_taxis);
        println!(
            "Wait thresholds: {} / {}",
            params.lower_wait_threshold, params.upper_wait_threshold
        );
        println!("Matching algorithm: {:?}", params.matching_algorithm);
    }

    export_to_json(&results, "fleet_sweep_results.json")?;
    export_to_csv(&results, &parameter_sets, "fleet_sweep_results.csv")?;
    println!("\nResults exported to fleet_sweep_results.json and fleet_sweep_results.csv");

    Ok(())
}
