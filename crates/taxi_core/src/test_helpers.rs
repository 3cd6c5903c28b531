//! Test helpers for common test setup and utilities.
//!
//! Hand-built worlds for tests and benchmarks that need exact agent placement
//! instead of the random seeding done by [`crate::scenario::build_scenario`].

use bevy_ecs::prelude::{Entity, World};

use crate::clock::SimulationClock;
use crate::dispatch::DispatchQueue;
use crate::ecs::{Position, Resident, ResidentId, Taxi, TaxiId};
use crate::fleet::{FleetControllerConfig, FleetState, WaitTimeSamples};
use crate::matching::MatchingAlgorithmResource;
use crate::rng::SimRng;
use crate::scenario::VisitConfig;
use crate::spatial::{Grid, GridCell};
use crate::speed::SpeedModel;
use crate::telemetry::{SimMetrics, SimSnapshotConfig, SimSnapshots, SimTelemetry};

/// Seed shared by helpers so every test reuses the same random stream.
pub const TEST_SEED: u64 = 42;

/// Create a world with every simulation resource and no agents.
///
/// Visits are disabled (`visit_chance = 0`) so tests control every request.
pub fn create_test_world(width: u32, height: u32) -> World {
    let mut world = World::new();
    world.insert_resource(Grid::new(width, height));
    world.insert_resource(SimulationClock::default());
    world.insert_resource(SpeedModel::with_cells_per_tick(1));
    world.insert_resource(SimRng::seeded(TEST_SEED));
    world.insert_resource(DispatchQueue::default());
    world.insert_resource(WaitTimeSamples::default());
    world.insert_resource(FleetControllerConfig::default());
    world.insert_resource(FleetState::new(0, usize::MAX));
    world.insert_resource(VisitConfig {
        visit_chance: 0.0,
        ..Default::default()
    });
    world.insert_resource(MatchingAlgorithmResource::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(SimMetrics::default());
    world.insert_resource(SimSnapshotConfig::default());
    world.insert_resource(SimSnapshots::default());
    world
}

/// Spawn an idle taxi with the given id and register it in the [`FleetState`].
pub fn spawn_taxi(world: &mut World, id: u32, cell: GridCell) -> Entity {
    let speed = world.resource::<SpeedModel>().cells_per_tick();
    let id = TaxiId(id);
    let entity = world.spawn((Taxi::idle(id, speed), Position(cell))).id();
    world.resource_mut::<FleetState>().insert(id, entity);
    entity
}

/// Spawn an idle resident at home.
pub fn spawn_resident(world: &mut World, id: u32, home: GridCell) -> Entity {
    world
        .spawn((Resident::at_home(ResidentId(id), home), Position(home)))
        .id()
}
