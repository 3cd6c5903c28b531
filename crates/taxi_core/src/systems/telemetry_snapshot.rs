use bevy_ecs::prelude::{Entity, Query, Res, ResMut, Without};

use crate::clock::SimulationClock;
use crate::dispatch::DispatchQueue;
use crate::ecs::{Position, Resident, Retired, Taxi};
use crate::telemetry::{
    ResidentSnapshot, SimCounts, SimMetrics, SimSnapshot, SimSnapshotConfig, SimSnapshots,
    SimTelemetry, TaxiSnapshot,
};

/// Run condition: the snapshot interval has elapsed.
pub fn snapshot_due(
    clock: Option<Res<SimulationClock>>,
    config: Option<Res<SimSnapshotConfig>>,
    snapshots: Option<Res<SimSnapshots>>,
) -> bool {
    let (Some(clock), Some(config), Some(snapshots)) = (clock, config, snapshots) else {
        return false;
    };
    match snapshots.last_snapshot_at {
        None => true,
        Some(last) => clock.now().saturating_sub(last) >= config.interval_ticks,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn capture_snapshot_system(
    clock: Res<SimulationClock>,
    config: Res<SimSnapshotConfig>,
    queue: Res<DispatchQueue>,
    telemetry: Res<SimTelemetry>,
    metrics: Res<SimMetrics>,
    mut snapshots: ResMut<SimSnapshots>,
    taxis: Query<(Entity, &Taxi, &Position), Without<Retired>>,
    residents: Query<(Entity, &Resident, &Position)>,
) {
    let now = clock.now();
    let mut counts = SimCounts {
        pending_requests: queue.len(),
        completed_rides_total: telemetry.completed_rides_total,
        cancelled_requests_total: telemetry.requests_cancelled_total,
        ..Default::default()
    };

    let mut taxi_snapshots = Vec::new();
    for (entity, taxi, position) in taxis.iter() {
        counts.add_taxi(taxi.state);
        taxi_snapshots.push(TaxiSnapshot {
            entity,
            id: taxi.id,
            cell: position.0,
            state: taxi.state,
            rides_completed: taxi.rides_completed,
        });
    }
    taxi_snapshots.sort_unstable_by_key(|snapshot| snapshot.id);

    let mut resident_snapshots = Vec::new();
    for (entity, resident, position) in residents.iter() {
        counts.add_resident(resident.state);
        resident_snapshots.push(ResidentSnapshot {
            entity,
            id: resident.id,
            cell: position.0,
            state: resident.state,
        });
    }
    resident_snapshots.sort_unstable_by_key(|snapshot| snapshot.id);

    snapshots.last_snapshot_at = Some(now);
    snapshots.snapshots.push_back(SimSnapshot {
        tick: now,
        metrics: *metrics,
        counts,
        taxis: taxi_snapshots,
        residents: resident_snapshots,
    });

    if snapshots.snapshots.len() > config.max_snapshots {
        snapshots.snapshots.pop_front();
    }
}
