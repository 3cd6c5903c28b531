use bevy_ecs::prelude::Entity;

use super::algorithm::MatchingAlgorithm;
use super::types::{MatchRequest, TaxiCandidate};

/// Lowest-id idle taxi, ignoring distance.
///
/// A baseline for comparing against [`super::NearestTaxi`]; pickup legs get
/// longer but the choice is trivially predictable.
#[derive(Debug, Default)]
pub struct FirstIdleTaxi;

impl MatchingAlgorithm for FirstIdleTaxi {
    fn find_match(
        &self,
        _request: &MatchRequest,
        available_taxis: &[TaxiCandidate],
    ) -> Option<Entity> {
        available_taxis
            .iter()
            .min_by_key(|taxi| taxi.id)
            .map(|taxi| taxi.entity)
    }
}
