#![allow(dead_code)]

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, World};
use taxi_core::dispatch::DispatchQueue;
use taxi_core::ecs::{
    Position, RequestStatus, Resident, ResidentState, Retired, RideRequest, Taxi,
};
use taxi_core::fleet::FleetState;

/// Assert every structural invariant of the simulation. Works on `&World` so it can
/// run from a tick hook.
pub fn assert_invariants(world: &World) {
    let queue = world.resource::<DispatchQueue>();
    let fleet = world.resource::<FleetState>();

    let mut taxis: HashMap<Entity, (Taxi, Position)> = HashMap::new();
    let mut residents: HashMap<Entity, (Resident, Position)> = HashMap::new();
    let mut requests: HashMap<Entity, RideRequest> = HashMap::new();
    let mut active_taxis = 0;
    for entity in world.iter_entities() {
        if let (Some(taxi), Some(position)) = (entity.get::<Taxi>(), entity.get::<Position>()) {
            if !entity.contains::<Retired>() {
                active_taxis += 1;
            }
            taxis.insert(entity.id(), (*taxi, *position));
        }
        if let (Some(resident), Some(position)) =
            (entity.get::<Resident>(), entity.get::<Position>())
        {
            residents.insert(entity.id(), (*resident, *position));
        }
        if let Some(request) = entity.get::<RideRequest>() {
            requests.insert(entity.id(), *request);
        }
    }

    assert!(
        fleet.size() >= fleet.min_size() && fleet.size() <= fleet.max_size(),
        "fleet size {} outside [{}, {}]",
        fleet.size(),
        fleet.min_size(),
        fleet.max_size()
    );
    assert_eq!(active_taxis, fleet.size(), "active taxis match the fleet");

    for (entity, (taxi, _)) in &taxis {
        assert_eq!(
            taxi.is_idle(),
            taxi.assigned_request.is_none(),
            "{} idle iff unbound",
            taxi.id
        );
        if let Some(request) = taxi.assigned_request {
            let request = requests.get(&request).expect("bound request exists");
            assert_eq!(request.status, RequestStatus::Assigned);
            assert_eq!(request.taxi, Some(*entity));
        }
    }

    for (entity, request) in &requests {
        let queued = queue.iter().filter(|e| e.request == *entity).count();
        let bound = taxis
            .values()
            .filter(|(taxi, _)| taxi.assigned_request == Some(*entity))
            .count();
        match request.status {
            RequestStatus::Pending => {
                assert_eq!(queued, 1, "pending request queued exactly once");
                assert_eq!(bound, 0, "pending request has no taxi");
            }
            RequestStatus::Assigned => {
                assert_eq!(queued, 0, "assigned request left the queue");
                assert_eq!(bound, 1, "assigned request bound to exactly one taxi");
            }
            RequestStatus::Completed | RequestStatus::Cancelled => {
                assert_eq!(queued, 0, "closed request left the queue");
                assert_eq!(bound, 0, "closed request released its taxi");
            }
        }
    }

    for (resident, position) in residents.values() {
        match resident.state {
            ResidentState::Idle | ResidentState::Hosting => {
                assert_eq!(position.0, resident.home, "{} at home", resident.id);
            }
            ResidentState::Waiting => {
                let request = resident
                    .outstanding_request
                    .and_then(|r| requests.get(&r))
                    .expect("waiting resident has a request");
                assert_eq!(position.0, request.pickup, "{} at pickup", resident.id);
            }
            ResidentState::InTransit => {
                let request = resident
                    .outstanding_request
                    .and_then(|r| requests.get(&r))
                    .expect("riding resident has a request");
                let taxi = request
                    .taxi
                    .and_then(|t| taxis.get(&t))
                    .expect("riding resident has a taxi");
                assert_eq!(position.0, taxi.1 .0, "{} rides with its taxi", resident.id);
            }
            ResidentState::Visiting => {
                let host = resident
                    .counterpart
                    .and_then(|h| residents.get(&h))
                    .expect("visitor has a host");
                assert_eq!(position.0, host.1 .0, "{} with its host", resident.id);
                assert_eq!(host.0.state, ResidentState::Hosting);
            }
        }
    }
}
