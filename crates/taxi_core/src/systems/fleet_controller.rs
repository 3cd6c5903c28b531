//! Fleet size controller: once per evaluation period, grow or shrink the fleet
//! by at most one taxi based on the average assignment wait of the period.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut, Without};
use tracing::info;

use crate::clock::SimulationClock;
use crate::ecs::{Position, Retired, Taxi};
use crate::fleet::{
    FleetAction, FleetControllerConfig, FleetDecision, FleetState, WaitTimeSamples,
};
use crate::rng::SimRng;
use crate::spatial::Grid;
use crate::speed::SpeedModel;
use crate::telemetry::{FleetEvaluation, SimTelemetry};

/// Run condition: the current tick closes an evaluation period.
pub fn fleet_evaluation_due(
    clock: Option<Res<SimulationClock>>,
    config: Option<Res<FleetControllerConfig>>,
) -> bool {
    match (clock, config) {
        (Some(clock), Some(config)) => clock.is_period_end(config.evaluation_period),
        _ => false,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn fleet_controller_system(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    config: Res<FleetControllerConfig>,
    grid: Res<Grid>,
    speed: Res<SpeedModel>,
    mut rng: ResMut<SimRng>,
    mut fleet: ResMut<FleetState>,
    mut samples: ResMut<WaitTimeSamples>,
    mut telemetry: ResMut<SimTelemetry>,
    taxis: Query<&Taxi, Without<Retired>>,
) {
    let average_wait = samples.average();
    let size_before = fleet.size();

    let action = match config.decide(average_wait, &fleet) {
        FleetDecision::Grow => {
            let id = fleet.allocate_id();
            let cell = grid.random_cell(rng.inner());
            let entity = commands
                .spawn((Taxi::idle(id, speed.cells_per_tick()), Position(cell)))
                .id();
            fleet.insert(id, entity);
            FleetAction::Added(id)
        }
        FleetDecision::Shrink => {
            let newest_idle = taxis
                .iter()
                .filter(|taxi| taxi.is_idle() && fleet.contains(taxi.id))
                .map(|taxi| taxi.id)
                .max();
            match newest_idle.and_then(|id| fleet.remove(id).map(|entity| (id, entity))) {
                Some((id, entity)) => {
                    commands.entity(entity).insert(Retired);
                    FleetAction::Retired(id)
                }
                None => FleetAction::RetirementSkipped,
            }
        }
        FleetDecision::Hold => FleetAction::Unchanged,
    };

    let evaluation = FleetEvaluation {
        tick: clock.now(),
        day: clock.day(),
        samples: samples.len(),
        average_wait,
        fleet_size_before: size_before,
        fleet_size_after: fleet.size(),
        action,
    };
    info!(
        day = evaluation.day,
        tick = evaluation.tick,
        samples = evaluation.samples,
        average_wait = ?evaluation.average_wait,
        action = ?evaluation.action,
        fleet_size = evaluation.fleet_size_after,
        "fleet evaluation"
    );
    telemetry.fleet_evaluations.push(evaluation);
    samples.clear();
}
