pub mod algorithm;
pub mod nearest;
pub mod simple;
pub mod types;

use bevy_ecs::prelude::Resource;

pub use algorithm::MatchingAlgorithm;
pub use nearest::NearestTaxi;
pub use simple::FirstIdleTaxi;
pub use types::{MatchRequest, TaxiCandidate};

/// Resource wrapper for the matching algorithm trait object.
#[derive(Resource)]
pub struct MatchingAlgorithmResource(pub Box<dyn MatchingAlgorithm>);

impl MatchingAlgorithmResource {
    pub fn new(algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        Self(algorithm)
    }
}

impl Default for MatchingAlgorithmResource {
    fn default() -> Self {
        Self::new(Box::new(NearestTaxi))
    }
}

impl std::ops::Deref for MatchingAlgorithmResource {
    type Target = dyn MatchingAlgorithm;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
