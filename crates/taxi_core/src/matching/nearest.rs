use bevy_ecs::prelude::Entity;

use crate::spatial::manhattan_distance;

use super::algorithm::MatchingAlgorithm;
use super::types::{MatchRequest, TaxiCandidate};

/// Nearest idle taxi by Manhattan distance to pickup; ties go to the lowest taxi id,
/// which keeps seeded runs reproducible regardless of query iteration order.
#[derive(Debug, Default)]
pub struct NearestTaxi;

impl MatchingAlgorithm for NearestTaxi {
    fn find_match(
        &self,
        request: &MatchRequest,
        available_taxis: &[TaxiCandidate],
    ) -> Option<Entity> {
        available_taxis
            .iter()
            .min_by_key(|taxi| (manhattan_distance(taxi.position, request.pickup), taxi.id))
            .map(|taxi| taxi.entity)
    }
}
