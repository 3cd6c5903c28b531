use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::SimulationClock;
use crate::ecs::{
    Position, RequestStatus, Resident, ResidentState, RideRequest, Taxi, TaxiState, TripLeg,
};
use crate::rng::SimRng;
use crate::scenario::VisitConfig;
use crate::telemetry::{CompletedRideRecord, SimTelemetry};

/// Taxis that reached the destination drop the resident off, close the request and go idle.
///
/// An outbound drop-off starts the visit: the traveler begins visiting and the host, whose
/// reservation is consumed, starts hosting. A return drop-off leaves the traveler idle at home.
pub fn trip_completed_system(
    clock: Res<SimulationClock>,
    visit_config: Res<VisitConfig>,
    mut rng: ResMut<SimRng>,
    mut telemetry: ResMut<SimTelemetry>,
    mut taxis: Query<(&mut Taxi, &Position)>,
    mut requests: Query<&mut RideRequest>,
    mut residents: Query<&mut Resident>,
) {
    let now = clock.now();
    for (mut taxi, position) in taxis.iter_mut() {
        if taxi.state != TaxiState::ToDestination {
            continue;
        }
        let Some(request_entity) = taxi.assigned_request else {
            continue;
        };
        let Ok(mut request) = requests.get_mut(request_entity) else {
            continue;
        };
        if position.0 != request.destination {
            continue;
        }

        request.status = RequestStatus::Completed;
        request.completed_at = Some(now);
        taxi.state = TaxiState::Idle;
        taxi.assigned_request = None;
        taxi.rides_completed += 1;

        let Ok([mut traveler, mut host]) =
            residents.get_many_mut([request.requester, request.host])
        else {
            continue;
        };

        match request.leg {
            TripLeg::Outbound => {
                traveler.state = ResidentState::Visiting;
                traveler.outstanding_request = None;
                traveler.counterpart = Some(request.host);
                traveler.visits_made += 1;
                traveler.visit_ends_at = Some(now + visit_config.sample_visit_ticks(&mut rng));

                host.state = ResidentState::Hosting;
                host.expecting_guest = None;
                host.counterpart = Some(request.requester);
                host.visits_hosted += 1;
            }
            TripLeg::Return => {
                traveler.state = ResidentState::Idle;
                traveler.outstanding_request = None;
                traveler.counterpart = None;
                traveler.visit_ends_at = None;
            }
        }

        telemetry.completed_rides_total += 1;
        telemetry.completed_rides.push(CompletedRideRecord {
            taxi: taxi.id,
            resident: traveler.id,
            host: host.id,
            leg: request.leg,
            requested_at: request.created_at,
            assigned_at: request.assigned_at.unwrap_or(request.created_at),
            pickup_at: request.pickup_at.unwrap_or(now),
            completed_at: now,
        });

        debug!(
            tick = now,
            taxi = %taxi.id,
            resident = %traveler.id,
            leg = ?request.leg,
            "drop-off"
        );
    }
}
