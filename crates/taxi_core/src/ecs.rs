use std::fmt;

use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::spatial::GridCell;

/// Stable taxi identity. Allocated by [`crate::fleet::FleetState`] and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TaxiId(pub u32);

impl fmt::Display for TaxiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Taxi-{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ResidentId(pub u32);

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resident-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxiState {
    Idle,
    ToPickup,
    ToDestination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Taxi {
    pub id: TaxiId,
    pub state: TaxiState,
    /// Ride request being served; `Some` exactly when the taxi is not idle.
    pub assigned_request: Option<Entity>,
    pub rides_completed: u32,
    /// Cells advanced per tick.
    pub speed: u32,
}

impl Taxi {
    pub fn idle(id: TaxiId, speed: u32) -> Self {
        Self {
            id,
            state: TaxiState::Idle,
            assigned_request: None,
            rides_completed: 0,
            speed,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == TaxiState::Idle
    }
}

/// Marks a taxi removed from the fleet. The entity stays alive so handles held
/// elsewhere never dangle; retired taxis are invisible to dispatch.
#[derive(Debug, Clone, Copy, Default, Component)]
pub struct Retired;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidentState {
    Idle,
    Waiting,
    InTransit,
    Visiting,
    Hosting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Resident {
    pub id: ResidentId,
    pub home: GridCell,
    pub state: ResidentState,
    /// Host while travelling to or visiting; guest while hosting.
    pub counterpart: Option<Entity>,
    /// Traveler who reserved this resident as host and has not arrived yet.
    pub expecting_guest: Option<Entity>,
    /// Request this resident is waiting on or riding in.
    pub outstanding_request: Option<Entity>,
    /// Tick at which the current visit ends.
    pub visit_ends_at: Option<u64>,
    pub visits_made: u32,
    pub visits_hosted: u32,
}

impl Resident {
    pub fn at_home(id: ResidentId, home: GridCell) -> Self {
        Self {
            id,
            home,
            state: ResidentState::Idle,
            counterpart: None,
            expecting_guest: None,
            outstanding_request: None,
            visit_ends_at: None,
            visits_made: 0,
            visits_hosted: 0,
        }
    }

    /// Idle, unreserved residents can start a visit or be chosen as a host.
    pub fn is_available(&self) -> bool {
        self.state == ResidentState::Idle && self.expecting_guest.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Assigned,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripLeg {
    /// Requester's home to the host's home.
    Outbound,
    /// Host's home back to the requester's home.
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct RideRequest {
    pub requester: Entity,
    pub host: Entity,
    pub leg: TripLeg,
    pub pickup: GridCell,
    pub destination: GridCell,
    pub created_at: u64,
    pub status: RequestStatus,
    /// Taxi bound to this request; set on assignment and kept for the record after completion.
    pub taxi: Option<Entity>,
    pub assigned_at: Option<u64>,
    pub pickup_at: Option<u64>,
    pub completed_at: Option<u64>,
}

impl RideRequest {
    pub fn new(
        requester: Entity,
        host: Entity,
        leg: TripLeg,
        pickup: GridCell,
        destination: GridCell,
        created_at: u64,
    ) -> Self {
        Self {
            requester,
            host,
            leg,
            pickup,
            destination,
            created_at,
            status: RequestStatus::Pending,
            taxi: None,
            assigned_at: None,
            pickup_at: None,
            completed_at: None,
        }
    }

    /// Ticks elapsed since the request was created.
    pub fn waiting_time(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self.status,
            RequestStatus::Completed | RequestStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Position(pub GridCell);
