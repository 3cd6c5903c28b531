use bevy_ecs::prelude::{Query, Res};
use tracing::debug;

use crate::clock::SimulationClock;
use crate::ecs::{Position, Resident, ResidentState, RideRequest, Taxi, TaxiState};

/// Taxis that reached their pickup board the waiting resident and head for the destination.
pub fn trip_started_system(
    clock: Res<SimulationClock>,
    mut taxis: Query<(&mut Taxi, &Position)>,
    mut requests: Query<&mut RideRequest>,
    mut residents: Query<&mut Resident>,
) {
    let now = clock.now();
    for (mut taxi, position) in taxis.iter_mut() {
        if taxi.state != TaxiState::ToPickup {
            continue;
        }
        let Some(request_entity) = taxi.assigned_request else {
            continue;
        };
        let Ok(mut request) = requests.get_mut(request_entity) else {
            continue;
        };
        if position.0 != request.pickup {
            continue;
        }

        taxi.state = TaxiState::ToDestination;
        request.pickup_at = Some(now);
        if let Ok(mut resident) = residents.get_mut(request.requester) {
            resident.state = ResidentState::InTransit;
            debug!(tick = now, taxi = %taxi.id, resident = %resident.id, "pickup");
        }
    }
}
