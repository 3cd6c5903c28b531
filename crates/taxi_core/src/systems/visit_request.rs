//! Visit initiation: idle residents decide to visit someone and call a taxi.
//!
//! Initiators are rolled against the start-of-phase state in a shuffled
//! activation order; hosts are then claimed one initiator at a time, so a
//! resident reserved as a host earlier in the pass can neither initiate nor
//! be chosen again.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use tracing::debug;

use crate::clock::SimulationClock;
use crate::dispatch::DispatchQueue;
use crate::ecs::{Resident, ResidentState, RideRequest, TripLeg};
use crate::rng::SimRng;
use crate::scenario::VisitConfig;
use crate::telemetry::SimTelemetry;

pub fn visit_request_system(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    config: Res<VisitConfig>,
    mut rng: ResMut<SimRng>,
    mut queue: ResMut<DispatchQueue>,
    mut telemetry: ResMut<SimTelemetry>,
    mut residents: Query<(Entity, &mut Resident)>,
) {
    let mut available: Vec<(Entity, u32)> = residents
        .iter()
        .filter(|(_, resident)| resident.is_available())
        .map(|(entity, resident)| (entity, resident.id.0))
        .collect();
    if available.len() < 2 {
        return;
    }
    available.sort_unstable_by_key(|(_, id)| *id);
    let mut available: Vec<Entity> = available.into_iter().map(|(entity, _)| entity).collect();

    let mut activation_order = available.clone();
    rng.shuffle(&mut activation_order);
    let initiators: Vec<Entity> = activation_order
        .into_iter()
        .filter(|_| rng.gen_bool(config.visit_chance))
        .collect();

    let now = clock.now();
    for traveler in initiators {
        // Claimed as a host by an earlier initiator this tick.
        let Some(index) = available.iter().position(|e| *e == traveler) else {
            continue;
        };
        if available.len() < 2 {
            break;
        }
        available.swap_remove(index);
        let host_index = rng.gen_range(0..available.len());
        let host = available.swap_remove(host_index);

        let Ok([(_, mut traveler_res), (_, mut host_res)]) =
            residents.get_many_mut([traveler, host])
        else {
            continue;
        };

        let request = commands
            .spawn(RideRequest::new(
                traveler,
                host,
                TripLeg::Outbound,
                traveler_res.home,
                host_res.home,
                now,
            ))
            .id();
        queue.push(request, now);
        telemetry.requests_created_total += 1;

        traveler_res.state = ResidentState::Waiting;
        traveler_res.outstanding_request = Some(request);
        traveler_res.counterpart = Some(host);
        host_res.expecting_guest = Some(traveler);

        debug!(
            tick = now,
            traveler = %traveler_res.id,
            host = %host_res.id,
            "visit requested"
        );
    }
}
