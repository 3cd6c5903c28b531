use bevy_ecs::prelude::{Query, Res, ResMut, Without};

use crate::clock::SimulationClock;
use crate::dispatch::DispatchQueue;
use crate::ecs::{Retired, Taxi};
use crate::fleet::{FleetState, WaitTimeSamples};
use crate::telemetry::{SimMetrics, SimTelemetry};

/// Refresh the per-tick read-only metrics.
pub fn metrics_system(
    clock: Res<SimulationClock>,
    queue: Res<DispatchQueue>,
    fleet: Res<FleetState>,
    samples: Res<WaitTimeSamples>,
    telemetry: Res<SimTelemetry>,
    mut metrics: ResMut<SimMetrics>,
    taxis: Query<&Taxi, Without<Retired>>,
) {
    let now = clock.now();
    *metrics = SimMetrics {
        tick: now,
        taxi_count: fleet.size(),
        idle_taxis: taxis.iter().filter(|taxi| taxi.is_idle()).count(),
        pending_requests: queue.len(),
        average_pending_wait: queue.average_waiting_time(now),
        rolling_average_wait: samples.average(),
        completed_rides_total: telemetry.completed_rides_total,
    };
}
