use bevy_ecs::prelude::Entity;

use super::types::{MatchRequest, TaxiCandidate};

/// Chooses which idle taxi serves a request.
///
/// The dispatch pass decides *which request* goes next (longest wait first);
/// implementations decide *which taxi* gets it. Returning `None` while taxis are
/// available leaves the request at the head of the queue for the next tick.
pub trait MatchingAlgorithm: Send + Sync {
    fn find_match(
        &self,
        request: &MatchRequest,
        available_taxis: &[TaxiCandidate],
    ) -> Option<Entity>;
}
