//! Parameter variation framework for exploring the simulation parameter space.
//!
//! A [`ParameterSpace`] lists the values to try per dimension; dimensions left
//! empty fall back to the base [`ScenarioParams`]. Grid search produces the
//! Cartesian product, random sampling draws a subset of it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use taxi_core::scenario::{MatchingAlgorithmType, ScenarioParams};
use tracing::debug;

#[path = "parameters/combinations.rs"]
mod combinations;

use combinations::ParameterVariations;

/// Simulated days per run when the space does not vary the duration.
pub const DEFAULT_DAYS: u64 = 1;

/// A single parameter configuration for a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSet {
    /// Scenario parameters, seed included.
    pub params: ScenarioParams,
    /// Shared by every run of the same parameter combination.
    pub experiment_id: String,
    /// Run index within the experiment (one per seed).
    pub run_id: usize,
    /// Simulated days to run.
    pub days: u64,
}

impl ParameterSet {
    pub fn new(params: ScenarioParams, experiment_id: String, run_id: usize, days: u64) -> Self {
        Self {
            params,
            experiment_id,
            run_id,
            days,
        }
    }

    /// Scenario params with the end tick derived from `days`.
    pub fn scenario_params(&self) -> ScenarioParams {
        self.params.clone().with_simulation_days(self.days)
    }

    pub fn seed(&self) -> Option<u64> {
        self.params.seed
    }

    /// Number of ticks the run lasts.
    pub fn total_ticks(&self) -> u64 {
        self.days.saturating_mul(self.params.ticks_per_day)
    }
}

/// Defines a parameter space for exploration.
#[derive(Debug, Clone, Default)]
pub struct ParameterSpace {
    /// Base parameters (used as defaults for unspecified dimensions).
    base: ScenarioParams,
    initial_taxis: Vec<usize>,
    initial_residents: Vec<usize>,
    visit_chances: Vec<f64>,
    lower_wait_thresholds: Vec<f64>,
    upper_wait_thresholds: Vec<f64>,
    matching_algorithms: Vec<MatchingAlgorithmType>,
    /// One run per seed for every combination.
    seeds: Vec<u64>,
    days: Vec<u64>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new parameter space for grid search.
    pub fn grid() -> Self {
        Self::new()
    }

    /// Set base parameters (used as defaults).
    pub fn with_base(mut self, base: ScenarioParams) -> Self {
        self.base = base;
        self
    }

    pub fn initial_taxis(mut self, counts: Vec<usize>) -> Self {
        self.initial_taxis = counts;
        self
    }

    pub fn initial_residents(mut self, counts: Vec<usize>) -> Self {
        self.initial_residents = counts;
        self
    }

    pub fn visit_chance(mut self, chances: Vec<f64>) -> Self {
        self.visit_chances = chances;
        self
    }

    pub fn lower_wait_threshold(mut self, thresholds: Vec<f64>) -> Self {
        self.lower_wait_thresholds = thresholds;
        self
    }

    pub fn upper_wait_threshold(mut self, thresholds: Vec<f64>) -> Self {
        self.upper_wait_thresholds = thresholds;
        self
    }

    pub fn matching_algorithm(mut self, algorithms: Vec<MatchingAlgorithmType>) -> Self {
        self.matching_algorithms = algorithms;
        self
    }

    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Set simulation durations (in days) to explore.
    pub fn days(mut self, days: Vec<u64>) -> Self {
        self.days = days;
        self
    }

    /// Generate all parameter sets using grid search (Cartesian product).
    ///
    /// Combinations rejected by [`ScenarioParams::validate`] (and zero-day runs)
    /// are dropped before experiment ids are assigned, so ids stay contiguous.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let variations = ParameterVariations::from_space(self);
        let mut parameter_sets = Vec::new();
        let mut rejected = 0usize;

        let valid = variations.combinations().into_iter().filter(|combo| {
            let ok = combo.days > 0 && combo.params.validate().is_ok();
            if !ok {
                rejected += 1;
            }
            ok
        });

        for (experiment_index, combo) in valid.enumerate() {
            let experiment_id = format!("exp_{experiment_index}");
            let seeds = if self.seeds.is_empty() {
                vec![combo
                    .params
                    .seed
                    .unwrap_or_else(|| (experiment_index as u64).wrapping_mul(0x9e37_79b9))]
            } else {
                self.seeds.clone()
            };

            for (run_id, seed) in seeds.into_iter().enumerate() {
                parameter_sets.push(ParameterSet::new(
                    combo.params.clone().with_seed(seed),
                    experiment_id.clone(),
                    run_id,
                    combo.days,
                ));
            }
        }

        debug!(
            generated = parameter_sets.len(),
            rejected, "parameter space expanded"
        );
        parameter_sets
    }

    /// Draw up to `count` distinct parameter sets from the grid (Monte Carlo sampling).
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate()
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect()
    }
}
