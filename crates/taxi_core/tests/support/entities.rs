#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use taxi_core::dispatch::DispatchQueue;
use taxi_core::ecs::{Resident, ResidentState, RideRequest, TripLeg};
use taxi_core::spatial::GridCell;
use taxi_core::test_helpers::{spawn_resident, spawn_taxi};

/// Builder for idle taxi fixtures; the taxi joins the fleet on spawn.
#[derive(Clone, Copy, Debug)]
pub struct TaxiBuilder {
    id: u32,
    position: GridCell,
}

impl TaxiBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            position: GridCell::new(0, 0),
        }
    }

    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.position = GridCell::new(x, y);
        self
    }

    pub fn spawn(self, world: &mut World) -> Entity {
        spawn_taxi(world, self.id, self.position)
    }
}

/// Builder for resident fixtures living at a fixed home.
#[derive(Clone, Copy, Debug)]
pub struct ResidentBuilder {
    id: u32,
    home: GridCell,
}

impl ResidentBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            home: GridCell::new(0, 0),
        }
    }

    pub fn home(mut self, x: u32, y: u32) -> Self {
        self.home = GridCell::new(x, y);
        self
    }

    pub fn spawn(self, world: &mut World) -> Entity {
        spawn_resident(world, self.id, self.home)
    }
}

/// Make `traveler` call a taxi to visit `host`, as the visit initiation phase would:
/// the request is spawned pending and queued, the traveler waits and the host is reserved.
pub fn request_visit(world: &mut World, traveler: Entity, host: Entity, created_at: u64) -> Entity {
    let pickup = world.get::<Resident>(traveler).expect("traveler").home;
    let destination = world.get::<Resident>(host).expect("host").home;
    let request = world
        .spawn(RideRequest::new(
            traveler,
            host,
            TripLeg::Outbound,
            pickup,
            destination,
            created_at,
        ))
        .id();
    {
        let mut resident = world.get_mut::<Resident>(traveler).expect("traveler");
        resident.state = ResidentState::Waiting;
        resident.outstanding_request = Some(request);
        resident.counterpart = Some(host);
    }
    world
        .get_mut::<Resident>(host)
        .expect("host")
        .expecting_guest = Some(traveler);
    world
        .resource_mut::<DispatchQueue>()
        .push(request, created_at);
    request
}
