//! Dispatch pass: drains the queue longest-wait-first against idle taxis.

use std::collections::HashSet;

use bevy_ecs::prelude::{Entity, Query, Res, ResMut, Without};
use tracing::{debug, warn};

use crate::clock::SimulationClock;
use crate::dispatch::DispatchQueue;
use crate::ecs::{
    Position, RequestStatus, Resident, ResidentState, Retired, RideRequest, Taxi, TaxiState,
    TripLeg,
};
use crate::fleet::WaitTimeSamples;
use crate::matching::{MatchRequest, MatchingAlgorithmResource, TaxiCandidate};
use crate::scenario::VisitConfig;
use crate::spatial::manhattan_distance;
use crate::telemetry::{AssignmentRecord, SimTelemetry};

/// Close a pending request and put its requester back to idle at home,
/// releasing the host reservation.
fn cancel_request(
    request_entity: Entity,
    request: &mut RideRequest,
    residents: &mut Query<&mut Resident>,
    telemetry: &mut SimTelemetry,
    now: u64,
) {
    request.status = RequestStatus::Cancelled;
    request.completed_at = Some(now);
    telemetry.requests_cancelled_total += 1;

    if let Ok(mut requester) = residents.get_mut(request.requester) {
        if requester.outstanding_request == Some(request_entity) {
            requester.state = ResidentState::Idle;
            requester.outstanding_request = None;
            requester.counterpart = None;
        }
    }
    if let Ok(mut host) = residents.get_mut(request.host) {
        if host.expecting_guest == Some(request.requester) {
            host.expecting_guest = None;
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn dispatch_system(
    clock: Res<SimulationClock>,
    visit_config: Res<VisitConfig>,
    matching: Res<MatchingAlgorithmResource>,
    mut queue: ResMut<DispatchQueue>,
    mut samples: ResMut<WaitTimeSamples>,
    mut telemetry: ResMut<SimTelemetry>,
    mut requests: Query<&mut RideRequest>,
    mut residents: Query<&mut Resident>,
    mut taxis: Query<(Entity, &mut Taxi, &Position), Without<Retired>>,
) {
    let now = clock.now();

    if let Some(patience) = visit_config.max_wait_ticks {
        let overdue: Vec<Entity> = queue
            .iter()
            .filter(|entry| entry.waiting_time(now) > patience)
            .map(|entry| entry.request)
            .collect();
        let mut expired = HashSet::new();
        for request_entity in overdue {
            let Ok(mut request) = requests.get_mut(request_entity) else {
                continue;
            };
            if request.leg != TripLeg::Outbound || request.status != RequestStatus::Pending {
                continue;
            }
            warn!(
                tick = now,
                waited = request.waiting_time(now),
                patience,
                "ride request cancelled: no taxi in time"
            );
            cancel_request(
                request_entity,
                &mut request,
                &mut residents,
                &mut telemetry,
                now,
            );
            expired.insert(request_entity);
        }
        if !expired.is_empty() {
            queue.retain(|entry| !expired.contains(&entry.request));
        }
    }

    let mut candidates: Vec<TaxiCandidate> = taxis
        .iter()
        .filter(|(_, taxi, _)| taxi.is_idle())
        .map(|(entity, taxi, position)| TaxiCandidate {
            entity,
            id: taxi.id,
            position: position.0,
        })
        .collect();
    candidates.sort_unstable_by_key(|candidate| candidate.id);

    while !candidates.is_empty() {
        let Some(entry) = queue.pop() else {
            break;
        };
        let Ok(mut request) = requests.get_mut(entry.request) else {
            continue;
        };
        if request.status != RequestStatus::Pending {
            continue;
        }

        let requester = residents
            .get(request.requester)
            .ok()
            .filter(|resident| {
                resident.state == ResidentState::Waiting
                    && resident.outstanding_request == Some(entry.request)
            })
            .map(|resident| resident.id);
        let Some(resident) = requester else {
            debug!(tick = now, "ride request cancelled: requester no longer waiting");
            cancel_request(
                entry.request,
                &mut request,
                &mut residents,
                &mut telemetry,
                now,
            );
            continue;
        };

        let match_request = MatchRequest {
            request: entry.request,
            pickup: request.pickup,
            waiting_ticks: entry.waiting_time(now),
        };
        let Some(taxi_entity) = matching.find_match(&match_request, &candidates) else {
            queue.requeue(entry);
            break;
        };
        let Some(slot) = candidates.iter().position(|c| c.entity == taxi_entity) else {
            queue.requeue(entry);
            break;
        };
        let candidate = candidates.remove(slot);

        let Ok((_, mut taxi, _)) = taxis.get_mut(taxi_entity) else {
            queue.requeue(entry);
            continue;
        };
        taxi.state = TaxiState::ToPickup;
        taxi.assigned_request = Some(entry.request);

        request.status = RequestStatus::Assigned;
        request.taxi = Some(taxi_entity);
        request.assigned_at = Some(now);

        samples.record(match_request.waiting_ticks);
        let pickup_distance = manhattan_distance(candidate.position, request.pickup);
        telemetry.assignments.push(AssignmentRecord {
            tick: now,
            taxi: candidate.id,
            resident,
            waiting_ticks: match_request.waiting_ticks,
            pickup_distance,
        });

        debug!(
            tick = now,
            taxi = %candidate.id,
            resident = %resident,
            waited = match_request.waiting_ticks,
            pickup_distance,
            "taxi assigned"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::ecs::{ResidentId, TaxiId};
    use crate::spatial::GridCell;

    struct Fixture {
        world: World,
    }

    impl Fixture {
        fn new(now: u64) -> Self {
            let mut world = World::new();
            let mut clock = SimulationClock::new(100);
            for _ in 0..now {
                clock.advance();
            }
            world.insert_resource(clock);
            world.insert_resource(VisitConfig::default());
            world.insert_resource(MatchingAlgorithmResource::default());
            world.insert_resource(DispatchQueue::default());
            world.insert_resource(WaitTimeSamples::default());
            world.insert_resource(SimTelemetry::default());
            Self { world }
        }

        fn taxi(&mut self, id: u32, at: (u32, u32)) -> Entity {
            self.world
                .spawn((Taxi::idle(TaxiId(id), 1), Position(GridCell::from(at))))
                .id()
        }

        /// A waiting traveler at `from` with a queued request created at `created_at`.
        fn request(&mut self, resident_id: u32, from: (u32, u32), created_at: u64) -> Entity {
            let home = GridCell::from(from);
            let host_home = GridCell::new(from.0 + 1, from.1);
            let traveler = self
                .world
                .spawn((Resident::at_home(ResidentId(resident_id), home), Position(home)))
                .id();
            let host = self
                .world
                .spawn((
                    Resident::at_home(ResidentId(resident_id + 1000), host_home),
                    Position(host_home),
                ))
                .id();
            let request = self
                .world
                .spawn(RideRequest::new(
                    traveler,
                    host,
                    TripLeg::Outbound,
                    home,
                    host_home,
                    created_at,
                ))
                .id();
            {
                let mut resident = self.world.get_mut::<Resident>(traveler).expect("traveler");
                resident.state = ResidentState::Waiting;
                resident.outstanding_request = Some(request);
                resident.counterpart = Some(host);
            }
            self.world
                .get_mut::<Resident>(host)
                .expect("host")
                .expecting_guest = Some(traveler);
            self.world
                .resource_mut::<DispatchQueue>()
                .push(request, created_at);
            request
        }

        fn run(&mut self) {
            let mut schedule = Schedule::default();
            schedule.add_systems(dispatch_system);
            schedule.run(&mut self.world);
        }

        fn request_state(&self, request: Entity) -> RideRequest {
            *self.world.get::<RideRequest>(request).expect("request")
        }
    }

    #[test]
    fn empty_queue_assigns_nothing() {
        let mut fixture = Fixture::new(0);
        let taxi = fixture.taxi(0, (0, 0));
        fixture.run();
        assert!(fixture.world.get::<Taxi>(taxi).expect("taxi").is_idle());
        assert!(fixture.world.resource::<SimTelemetry>().assignments.is_empty());
        assert!(fixture.world.resource::<WaitTimeSamples>().is_empty());
    }

    #[test]
    fn nearest_taxi_gets_the_request() {
        let mut fixture = Fixture::new(0);
        let near = fixture.taxi(0, (1, 0));
        let far = fixture.taxi(1, (5, 5));
        let request = fixture.request(1, (0, 0), 0);
        fixture.run();

        let state = fixture.request_state(request);
        assert_eq!(state.status, RequestStatus::Assigned);
        assert_eq!(state.taxi, Some(near));
        let taxi = fixture.world.get::<Taxi>(near).expect("taxi");
        assert_eq!(taxi.state, TaxiState::ToPickup);
        assert_eq!(taxi.assigned_request, Some(request));
        assert!(fixture.world.get::<Taxi>(far).expect("taxi").is_idle());
        assert!(fixture.world.resource::<DispatchQueue>().is_empty());
    }

    #[test]
    fn longest_waiting_request_served_first() {
        let mut fixture = Fixture::new(10);
        fixture.taxi(0, (50, 50));
        let recent = fixture.request(1, (0, 0), 8);
        let older = fixture.request(2, (90, 90), 2);
        fixture.run();

        assert_eq!(fixture.request_state(older).status, RequestStatus::Assigned);
        assert_eq!(fixture.request_state(recent).status, RequestStatus::Pending);
        assert_eq!(fixture.world.resource::<DispatchQueue>().len(), 1);
        assert_eq!(
            fixture.world.resource::<WaitTimeSamples>().average(),
            Some(8.0)
        );
    }

    #[test]
    fn retired_taxis_are_never_assigned() {
        let mut fixture = Fixture::new(0);
        let taxi = fixture.taxi(0, (0, 0));
        fixture.world.entity_mut(taxi).insert(Retired);
        let request = fixture.request(1, (0, 0), 0);
        fixture.run();
        assert_eq!(fixture.request_state(request).status, RequestStatus::Pending);
        assert_eq!(fixture.world.resource::<DispatchQueue>().len(), 1);
    }

    #[test]
    fn overdue_outbound_request_is_cancelled() {
        let mut fixture = Fixture::new(20);
        fixture.world.resource_mut::<VisitConfig>().max_wait_ticks = Some(5);
        let request = fixture.request(1, (0, 0), 3);
        fixture.run();

        let state = fixture.request_state(request);
        assert_eq!(state.status, RequestStatus::Cancelled);
        let traveler = fixture
            .world
            .get::<Resident>(state.requester)
            .expect("traveler");
        assert_eq!(traveler.state, ResidentState::Idle);
        assert_eq!(traveler.outstanding_request, None);
        let host = fixture.world.get::<Resident>(state.host).expect("host");
        assert_eq!(host.expecting_guest, None);
        assert!(fixture.world.resource::<DispatchQueue>().is_empty());
        assert_eq!(
            fixture.world.resource::<SimTelemetry>().requests_cancelled_total,
            1
        );
    }

    #[test]
    fn stale_request_is_dropped_without_consuming_a_taxi() {
        let mut fixture = Fixture::new(0);
        let taxi = fixture.taxi(0, (0, 0));
        let stale = fixture.request(1, (0, 0), 0);
        let live = fixture.request(2, (4, 4), 0);
        let requester = fixture.request_state(stale).requester;
        fixture
            .world
            .get_mut::<Resident>(requester)
            .expect("traveler")
            .outstanding_request = None;
        fixture.run();

        assert_eq!(fixture.request_state(stale).status, RequestStatus::Cancelled);
        assert_eq!(fixture.request_state(live).taxi, Some(taxi));
    }
}
