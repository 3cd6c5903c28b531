//! Run the default city for a few days and print the daily fleet reports.
//!
//! Run with: RUST_LOG=info cargo run -p taxi_core --example scenario_run

use bevy_ecs::prelude::World;
use taxi_core::runner::{run_until_end, simulation_schedule};
use taxi_core::scenario::{build_scenario, ScenarioParams};
use taxi_core::telemetry::{SimMetrics, SimTelemetry};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    const SIMULATION_DAYS: u64 = 5;

    let mut world = World::new();
    let params = ScenarioParams::default()
        .with_seed(123)
        .with_simulation_days(SIMULATION_DAYS);
    if let Err(err) = build_scenario(&mut world, params.clone()) {
        eprintln!("invalid scenario: {err}");
        std::process::exit(1);
    }

    let mut schedule = simulation_schedule();
    let ticks = run_until_end(&mut world, &mut schedule, u64::MAX);

    let telemetry = world.resource::<SimTelemetry>();
    let metrics = world.resource::<SimMetrics>();
    println!(
        "--- Scenario run ({}x{} grid, {} residents, {} days, seed 123) ---",
        params.width, params.height, params.initial_residents, SIMULATION_DAYS
    );
    println!("Ticks executed: {ticks}");
    println!("Requests created: {}", telemetry.requests_created_total);
    println!("Completed rides: {}", telemetry.completed_rides_total);
    println!("Pending requests: {}", metrics.pending_requests);
    println!("Final fleet size: {}", metrics.taxi_count);

    println!("\nDaily fleet reports:");
    for evaluation in &telemetry.fleet_evaluations {
        let average = evaluation
            .average_wait
            .map(|avg| format!("{avg:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  day {:>2}  avg wait {:>6} ticks over {:>4} assignments  fleet {} -> {}  {:?}",
            evaluation.day,
            average,
            evaluation.samples,
            evaluation.fleet_size_before,
            evaluation.fleet_size_after,
            evaluation.action,
        );
    }
}
