use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use tracing::debug;

use crate::clock::SimulationClock;
use crate::dispatch::DispatchQueue;
use crate::ecs::{Resident, ResidentState, RideRequest, TripLeg};
use crate::telemetry::SimTelemetry;

/// Visits that have run their course: the traveler calls a taxi home and the host is free again.
pub fn visit_end_system(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    mut queue: ResMut<DispatchQueue>,
    mut telemetry: ResMut<SimTelemetry>,
    mut residents: Query<(Entity, &mut Resident)>,
) {
    let now = clock.now();
    let mut finished: Vec<(u32, Entity, Entity)> = residents
        .iter()
        .filter(|(_, resident)| {
            resident.state == ResidentState::Visiting
                && resident.visit_ends_at.is_some_and(|end| end <= now)
        })
        .filter_map(|(entity, resident)| {
            resident
                .counterpart
                .map(|host| (resident.id.0, entity, host))
        })
        .collect();
    finished.sort_unstable_by_key(|(id, _, _)| *id);

    for (_, traveler, host) in finished {
        let Ok([(_, mut traveler_res), (_, mut host_res)]) =
            residents.get_many_mut([traveler, host])
        else {
            continue;
        };

        let request = commands
            .spawn(RideRequest::new(
                traveler,
                host,
                TripLeg::Return,
                host_res.home,
                traveler_res.home,
                now,
            ))
            .id();
        queue.push(request, now);
        telemetry.requests_created_total += 1;

        traveler_res.state = ResidentState::Waiting;
        traveler_res.outstanding_request = Some(request);
        traveler_res.counterpart = None;
        traveler_res.visit_ends_at = None;

        if host_res.state == ResidentState::Hosting && host_res.counterpart == Some(traveler) {
            host_res.state = ResidentState::Idle;
            host_res.counterpart = None;
        }

        debug!(
            tick = now,
            traveler = %traveler_res.id,
            host = %host_res.id,
            "visit over, return requested"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};
    use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

    use crate::ecs::{Position, RequestStatus, ResidentId};
    use crate::spatial::GridCell;

    fn visiting_pair(ends_at: u64) -> (World, Entity, Entity) {
        let mut world = World::new();
        world.insert_resource(SimulationClock::new(100));
        world.insert_resource(DispatchQueue::default());
        world.insert_resource(SimTelemetry::default());

        let a = GridCell::new(0, 0);
        let b = GridCell::new(9, 9);
        let traveler = world
            .spawn((Resident::at_home(ResidentId(0), a), Position(b)))
            .id();
        let host = world
            .spawn((Resident::at_home(ResidentId(1), b), Position(b)))
            .id();
        {
            let mut res = world.get_mut::<Resident>(traveler).expect("traveler");
            res.state = ResidentState::Visiting;
            res.counterpart = Some(host);
            res.visit_ends_at = Some(ends_at);
        }
        {
            let mut res = world.get_mut::<Resident>(host).expect("host");
            res.state = ResidentState::Hosting;
            res.counterpart = Some(traveler);
        }
        (world, traveler, host)
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((visit_end_system, apply_deferred).chain());
        schedule.run(world);
    }

    #[test]
    fn finished_visit_requests_ride_home() {
        let (mut world, traveler, host) = visiting_pair(0);
        run(&mut world);

        let traveler_res = *world.get::<Resident>(traveler).expect("traveler");
        assert_eq!(traveler_res.state, ResidentState::Waiting);
        let request_entity = traveler_res.outstanding_request.expect("return request");
        let request = world.get::<RideRequest>(request_entity).expect("request");
        assert_eq!(request.leg, TripLeg::Return);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.pickup, GridCell::new(9, 9));
        assert_eq!(request.destination, GridCell::new(0, 0));
        assert!(world.resource::<DispatchQueue>().contains(request_entity));

        let host_res = world.get::<Resident>(host).expect("host");
        assert_eq!(host_res.state, ResidentState::Idle);
        assert_eq!(host_res.counterpart, None);
    }

    #[test]
    fn ongoing_visit_is_left_alone() {
        let (mut world, traveler, _) = visiting_pair(40);
        run(&mut world);
        assert_eq!(
            world.get::<Resident>(traveler).expect("traveler").state,
            ResidentState::Visiting
        );
        assert!(world.resource::<DispatchQueue>().is_empty());
    }
}
