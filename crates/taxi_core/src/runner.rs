//! Simulation runner: owns the tick loop.
//!
//! Clock progression happens here, outside systems. Each tick runs the
//! schedule once against the current time, then advances the clock.

use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::SimulationClock;
use crate::scenario::SimulationEndTick;
use crate::systems::{
    dispatch::dispatch_system,
    fleet_controller::{fleet_controller_system, fleet_evaluation_due},
    metrics::metrics_system,
    movement::movement_system,
    telemetry_snapshot::{capture_snapshot_system, snapshot_due},
    trip_completed::trip_completed_system,
    trip_started::trip_started_system,
    visit_end::visit_end_system,
    visit_request::visit_request_system,
};

/// Builds the per-tick schedule.
///
/// Phases run strictly in order: visit initiation, dispatch, movement and state
/// advancement, fleet evaluation (at the end of each evaluation period), then
/// metrics and the snapshot (on its interval). [apply_deferred] sync points make
/// requests and taxis spawned by one phase visible to the next.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            visit_request_system,
            apply_deferred,
            dispatch_system,
            movement_system,
            trip_started_system,
            trip_completed_system,
            visit_end_system,
            apply_deferred,
            fleet_controller_system.run_if(fleet_evaluation_due),
            apply_deferred,
            metrics_system,
            capture_snapshot_system.run_if(snapshot_due),
        )
            .chain(),
    );
    schedule
}

/// Whether the clock has reached [SimulationEndTick] (when that resource is present).
pub fn is_finished(world: &World) -> bool {
    let Some(end) = world.get_resource::<SimulationEndTick>() else {
        return false;
    };
    world
        .get_resource::<SimulationClock>()
        .is_some_and(|clock| clock.now() >= end.0)
}

/// Runs one tick and advances the clock. Returns `false` without running anything
/// once the end tick is reached.
pub fn run_tick(world: &mut World, schedule: &mut Schedule) -> bool {
    if is_finished(world) {
        return false;
    }
    schedule.run(world);
    world.resource_mut::<SimulationClock>().advance();
    true
}

/// Runs one tick and invokes `hook` with the tick just simulated.
pub fn run_tick_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, u64),
{
    let tick = world.resource::<SimulationClock>().now();
    if !run_tick(world, schedule) {
        return false;
    }
    hook(world, tick);
    true
}

/// Runs up to `ticks` ticks, stopping early at the end tick.
/// Returns the number of ticks executed.
pub fn run_ticks(world: &mut World, schedule: &mut Schedule, ticks: u64) -> u64 {
    let mut executed = 0;
    while executed < ticks && run_tick(world, schedule) {
        executed += 1;
    }
    executed
}

/// Runs up to `ticks` ticks and invokes `hook` after each one.
pub fn run_ticks_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    ticks: u64,
    mut hook: F,
) -> u64
where
    F: FnMut(&World, u64),
{
    let mut executed = 0;
    while executed < ticks && run_tick_with_hook(world, schedule, &mut hook) {
        executed += 1;
    }
    executed
}

/// Runs until [SimulationEndTick] or until `max_ticks` ticks have run.
pub fn run_until_end(world: &mut World, schedule: &mut Schedule, max_ticks: u64) -> u64 {
    run_ticks(world, schedule, max_ticks)
}
