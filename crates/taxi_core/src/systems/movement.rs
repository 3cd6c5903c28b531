//! Movement system: advances every busy taxi toward its current leg target.
//!
//! A taxi heading for the pickup moves alone; on the destination leg the
//! carried resident moves with it, so the two stay co-located.

use bevy_ecs::prelude::{Query, Res, With, Without};

use crate::ecs::{Position, Resident, RideRequest, Taxi, TaxiState};
use crate::spatial::Grid;

#[allow(clippy::type_complexity)]
pub fn movement_system(
    grid: Res<Grid>,
    requests: Query<&RideRequest>,
    mut taxis: Query<(&Taxi, &mut Position), Without<Resident>>,
    mut passengers: Query<&mut Position, (With<Resident>, Without<Taxi>)>,
) {
    for (taxi, mut position) in taxis.iter_mut() {
        let Some(request_entity) = taxi.assigned_request else {
            continue;
        };
        let Ok(request) = requests.get(request_entity) else {
            continue;
        };
        let target = match taxi.state {
            TaxiState::Idle => continue,
            TaxiState::ToPickup => request.pickup,
            TaxiState::ToDestination => request.destination,
        };

        let next = grid.advance(position.0, target, taxi.speed);
        position.0 = next;

        if taxi.state == TaxiState::ToDestination {
            if let Ok(mut passenger) = passengers.get_mut(request.requester) {
                passenger.0 = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Entity, Schedule, World};

    use crate::ecs::{ResidentId, TaxiId, TripLeg};
    use crate::spatial::GridCell;

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(movement_system);
        schedule.run(world);
    }

    fn setup(state: TaxiState, taxi_at: GridCell, speed: u32) -> (World, Entity, Entity) {
        let mut world = World::new();
        world.insert_resource(Grid::new(20, 20));
        let home = GridCell::new(2, 0);
        let resident = world
            .spawn((Resident::at_home(ResidentId(0), home), Position(home)))
            .id();
        let request = world
            .spawn(RideRequest::new(
                resident,
                resident,
                TripLeg::Outbound,
                home,
                GridCell::new(10, 4),
                0,
            ))
            .id();
        let mut taxi = Taxi::idle(TaxiId(0), speed);
        taxi.state = state;
        taxi.assigned_request = Some(request);
        let taxi = world.spawn((taxi, Position(taxi_at))).id();
        (world, taxi, resident)
    }

    #[test]
    fn moves_toward_pickup_without_passenger() {
        let (mut world, taxi, resident) = setup(TaxiState::ToPickup, GridCell::new(9, 9), 3);
        run(&mut world);
        assert_eq!(
            world.get::<Position>(taxi).expect("taxi").0,
            GridCell::new(8, 7)
        );
        assert_eq!(
            world.get::<Position>(resident).expect("resident").0,
            GridCell::new(2, 0)
        );
    }

    #[test]
    fn carries_passenger_toward_destination() {
        let (mut world, taxi, resident) = setup(TaxiState::ToDestination, GridCell::new(2, 0), 4);
        run(&mut world);
        let taxi_cell = world.get::<Position>(taxi).expect("taxi").0;
        assert_eq!(taxi_cell, GridCell::new(6, 0));
        assert_eq!(world.get::<Position>(resident).expect("resident").0, taxi_cell);
    }

    #[test]
    fn never_overshoots_target() {
        let (mut world, taxi, _) = setup(TaxiState::ToPickup, GridCell::new(3, 1), 10);
        run(&mut world);
        assert_eq!(
            world.get::<Position>(taxi).expect("taxi").0,
            GridCell::new(2, 0)
        );
    }
}
