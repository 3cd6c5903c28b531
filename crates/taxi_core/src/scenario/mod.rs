//! Scenario setup: validate configuration, insert resources and seed the
//! initial taxi fleet and resident population.

mod build;
mod error;
mod params;

pub use build::{build_scenario, create_first_idle_matching, create_nearest_matching};
pub use error::ScenarioError;
pub use params::{MatchingAlgorithmType, ScenarioParams, SimulationEndTick, VisitConfig};
