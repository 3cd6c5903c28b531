use bevy_ecs::prelude::Entity;

use crate::ecs::TaxiId;
use crate::spatial::GridCell;

/// An idle taxi offered to the matching algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiCandidate {
    pub entity: Entity,
    pub id: TaxiId,
    pub position: GridCell,
}

/// A request handed to the matching algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRequest {
    pub request: Entity,
    pub pickup: GridCell,
    pub waiting_ticks: u64,
}
