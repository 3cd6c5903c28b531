use bevy_ecs::prelude::World;
use rand::seq::index;
use tracing::info;

use crate::clock::SimulationClock;
use crate::dispatch::DispatchQueue;
use crate::ecs::{Position, Resident, ResidentId, Taxi};
use crate::fleet::{FleetControllerConfig, FleetState, WaitTimeSamples};
use crate::matching::{FirstIdleTaxi, MatchingAlgorithmResource, NearestTaxi};
use crate::rng::SimRng;
use crate::scenario::params::{MatchingAlgorithmType, ScenarioParams, SimulationEndTick};
use crate::scenario::ScenarioError;
use crate::spatial::Grid;
use crate::speed::SpeedModel;
use crate::telemetry::{SimMetrics, SimSnapshotConfig, SimSnapshots, SimTelemetry};

pub fn create_nearest_matching() -> MatchingAlgorithmResource {
    MatchingAlgorithmResource::new(Box::new(NearestTaxi))
}

pub fn create_first_idle_matching() -> MatchingAlgorithmResource {
    MatchingAlgorithmResource::new(Box::new(FirstIdleTaxi))
}

/// Validate `params`, insert every simulation resource and seed the initial agents.
///
/// Taxis start idle on random cells; residents get distinct random homes. Nothing is
/// inserted when validation fails.
pub fn build_scenario(world: &mut World, params: ScenarioParams) -> Result<(), ScenarioError> {
    params.validate()?;

    let grid = Grid::new(params.width, params.height);
    let speed = SpeedModel::from_kmh(
        params.taxi_speed_kmh,
        params.ticks_per_day,
        params.cell_size_km,
    );
    let mut rng = SimRng::new(params.seed);

    world.insert_resource(grid);
    world.insert_resource(speed);
    world.insert_resource(SimulationClock::new(params.ticks_per_day));
    world.insert_resource(DispatchQueue::default());
    world.insert_resource(WaitTimeSamples::default());
    world.insert_resource(FleetControllerConfig {
        evaluation_period: params.evaluation_period(),
        lower_wait_threshold: params.lower_wait_threshold,
        upper_wait_threshold: params.upper_wait_threshold,
    });
    world.insert_resource(params.visit_config());
    world.insert_resource(match params.matching_algorithm {
        MatchingAlgorithmType::Nearest => create_nearest_matching(),
        MatchingAlgorithmType::FirstIdle => create_first_idle_matching(),
    });
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(SimMetrics::default());
    world.insert_resource(SimSnapshotConfig::default());
    world.insert_resource(SimSnapshots::default());
    if let Some(end_tick) = params.simulation_end_tick {
        world.insert_resource(SimulationEndTick(end_tick));
    }

    let mut fleet = FleetState::new(params.min_fleet_size, params.max_fleet_size);
    for _ in 0..params.initial_taxis {
        let id = fleet.allocate_id();
        let cell = grid.random_cell(rng.inner());
        let entity = world
            .spawn((Taxi::idle(id, speed.cells_per_tick()), Position(cell)))
            .id();
        fleet.insert(id, entity);
    }
    world.insert_resource(fleet);

    let homes = index::sample(rng.inner(), grid.cell_count(), params.initial_residents);
    for (i, cell_index) in homes.into_iter().enumerate() {
        let home = grid.cell_at(cell_index);
        world.spawn((Resident::at_home(ResidentId(i as u32), home), Position(home)));
    }
    world.insert_resource(rng);

    info!(
        width = params.width,
        height = params.height,
        taxis = params.initial_taxis,
        residents = params.initial_residents,
        cells_per_tick = speed.cells_per_tick(),
        "scenario built"
    );
    Ok(())
}
