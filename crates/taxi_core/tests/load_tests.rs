//! Load tests for taxi_core: validate performance on the full-size city.

use bevy_ecs::prelude::World;
use std::time::Instant;
use taxi_core::runner::{run_until_end, simulation_schedule};
use taxi_core::scenario::{build_scenario, ScenarioParams};
use taxi_core::telemetry::SimTelemetry;

#[test]
#[ignore] // Only run explicitly: cargo test --package taxi_core --test load_tests -- --ignored
fn test_default_city_for_ten_days() {
    let mut world = World::new();
    let params = ScenarioParams::default()
        .with_seed(42)
        .with_simulation_days(10);
    build_scenario(&mut world, params).expect("valid scenario");

    let start = Instant::now();
    let mut schedule = simulation_schedule();
    let ticks = run_until_end(&mut world, &mut schedule, u64::MAX);
    let duration = start.elapsed();

    let ticks_per_sec = ticks as f64 / duration.as_secs_f64();
    println!(
        "Default city: {} ticks in {:.2}s ({:.0} ticks/sec), {} rides",
        ticks,
        duration.as_secs_f64(),
        ticks_per_sec,
        world.resource::<SimTelemetry>().completed_rides_total
    );
    assert_eq!(ticks, 1_000);
    assert!(
        ticks_per_sec > 100.0,
        "Should process >100 ticks/sec, got {:.0}",
        ticks_per_sec
    );
}

#[test]
#[ignore]
fn test_saturated_city() {
    // Many residents, minimal fleet: the queue grows and the controller maxes out.
    let mut world = World::new();
    let params = ScenarioParams::default()
        .with_seed(7)
        .with_population(10, 5_000)
        .with_fleet_bounds(10, 40)
        .with_visit_chance(0.3)
        .with_simulation_days(5);
    build_scenario(&mut world, params).expect("valid scenario");

    let start = Instant::now();
    let mut schedule = simulation_schedule();
    let ticks = run_until_end(&mut world, &mut schedule, u64::MAX);
    println!(
        "Saturated city: {} ticks in {:.2}s",
        ticks,
        start.elapsed().as_secs_f64()
    );
    let telemetry = world.resource::<SimTelemetry>();
    assert!(telemetry.fleet_evaluations.len() == 5);
}
