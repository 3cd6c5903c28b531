use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::DEFAULT_TICKS_PER_DAY;
use crate::rng::SimRng;
use crate::scenario::ScenarioError;

/// Which [`crate::matching::MatchingAlgorithm`] picks the taxi for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchingAlgorithmType {
    #[default]
    Nearest,
    FirstIdle,
}

/// Simulation end tick. When set, the runner stops before running this tick.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTick(pub u64);

/// Resident behavior tuning.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct VisitConfig {
    /// Per-tick probability (0.0–1.0) that an available resident starts a visit.
    pub visit_chance: f64,
    /// Visit length in ticks, sampled uniformly in `[min_visit_ticks, max_visit_ticks]`.
    pub min_visit_ticks: u64,
    pub max_visit_ticks: u64,
    /// Outbound requests pending longer than this are cancelled. `None` = wait forever.
    pub max_wait_ticks: Option<u64>,
}

impl Default for VisitConfig {
    fn default() -> Self {
        Self {
            visit_chance: 0.1,
            min_visit_ticks: 30,
            max_visit_ticks: 180,
            max_wait_ticks: None,
        }
    }
}

impl VisitConfig {
    pub fn sample_visit_ticks(&self, rng: &mut SimRng) -> u64 {
        if self.min_visit_ticks >= self.max_visit_ticks {
            return self.min_visit_ticks;
        }
        rng.gen_range(self.min_visit_ticks..=self.max_visit_ticks)
    }
}

/// Parameters for building a simulation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub width: u32,
    pub height: u32,
    pub initial_taxis: usize,
    pub initial_residents: usize,
    pub ticks_per_day: u64,
    pub taxi_speed_kmh: f64,
    /// Edge length of one grid cell in km (used for speed conversion).
    pub cell_size_km: f64,
    pub min_fleet_size: usize,
    pub max_fleet_size: usize,
    pub lower_wait_threshold: f64,
    pub upper_wait_threshold: f64,
    /// Ticks between fleet evaluations. If None, one simulated day.
    pub fleet_evaluation_period: Option<u64>,
    pub visit_chance: f64,
    pub min_visit_ticks: u64,
    pub max_visit_ticks: u64,
    /// Patience of residents waiting for an outbound pickup. If None, requests never expire.
    pub max_wait_ticks: Option<u64>,
    pub matching_algorithm: MatchingAlgorithmType,
    pub seed: Option<u64>,
    /// Optional end tick. If set, the runner stops when this tick is reached.
    pub simulation_end_tick: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            width: 140,
            height: 170,
            initial_taxis: 50,
            initial_residents: 470,
            ticks_per_day: DEFAULT_TICKS_PER_DAY,
            taxi_speed_kmh: 20.0,
            cell_size_km: 0.5,
            min_fleet_size: 10,
            max_fleet_size: 100,
            lower_wait_threshold: 10.0,
            upper_wait_threshold: 60.0,
            fleet_evaluation_period: None,
            visit_chance: 0.1,
            min_visit_ticks: 30,
            max_visit_ticks: 180,
            max_wait_ticks: None,
            matching_algorithm: MatchingAlgorithmType::default(),
            seed: None,
            simulation_end_tick: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Initial population of taxis and residents.
    pub fn with_population(mut self, taxis: usize, residents: usize) -> Self {
        self.initial_taxis = taxis;
        self.initial_residents = residents;
        self
    }

    pub fn with_ticks_per_day(mut self, ticks_per_day: u64) -> Self {
        self.ticks_per_day = ticks_per_day;
        self
    }

    pub fn with_fleet_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_fleet_size = min;
        self.max_fleet_size = max;
        self
    }

    /// Average assignment wait (ticks) below which the fleet shrinks and above which it grows.
    pub fn with_wait_thresholds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_wait_threshold = lower;
        self.upper_wait_threshold = upper;
        self
    }

    pub fn with_visit_chance(mut self, chance: f64) -> Self {
        self.visit_chance = chance;
        self
    }

    pub fn with_visit_ticks(mut self, min: u64, max: u64) -> Self {
        self.min_visit_ticks = min;
        self.max_visit_ticks = max;
        self
    }

    pub fn with_max_wait_ticks(mut self, ticks: u64) -> Self {
        self.max_wait_ticks = Some(ticks);
        self
    }

    pub fn with_matching_algorithm(mut self, algorithm: MatchingAlgorithmType) -> Self {
        self.matching_algorithm = algorithm;
        self
    }

    /// Stop after `days` simulated days.
    pub fn with_simulation_days(mut self, days: u64) -> Self {
        self.simulation_end_tick = Some(days * self.ticks_per_day);
        self
    }

    pub fn evaluation_period(&self) -> u64 {
        self.fleet_evaluation_period.unwrap_or(self.ticks_per_day)
    }

    pub fn visit_config(&self) -> VisitConfig {
        VisitConfig {
            visit_chance: self.visit_chance,
            min_visit_ticks: self.min_visit_ticks,
            max_visit_ticks: self.max_visit_ticks,
            max_wait_ticks: self.max_wait_ticks,
        }
    }

    /// Reject configurations the simulation cannot start from.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.width == 0 || self.height == 0 {
            return Err(ScenarioError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.ticks_per_day == 0 {
            return Err(ScenarioError::ZeroTicksPerDay);
        }
        if self.fleet_evaluation_period == Some(0) {
            return Err(ScenarioError::ZeroEvaluationPeriod);
        }
        if !(self.taxi_speed_kmh.is_finite() && self.taxi_speed_kmh > 0.0) {
            return Err(ScenarioError::InvalidSpeed(self.taxi_speed_kmh));
        }
        if !(self.cell_size_km.is_finite() && self.cell_size_km > 0.0) {
            return Err(ScenarioError::InvalidCellSize(self.cell_size_km));
        }
        if self.min_fleet_size > self.max_fleet_size {
            return Err(ScenarioError::FleetBounds {
                min: self.min_fleet_size,
                max: self.max_fleet_size,
            });
        }
        if self.initial_taxis < self.min_fleet_size || self.initial_taxis > self.max_fleet_size {
            return Err(ScenarioError::InitialFleetOutOfBounds {
                initial: self.initial_taxis,
                min: self.min_fleet_size,
                max: self.max_fleet_size,
            });
        }
        let cells = self.width as usize * self.height as usize;
        if self.initial_residents > cells {
            return Err(ScenarioError::TooManyResidents {
                residents: self.initial_residents,
                cells,
            });
        }
        if !(0.0..=1.0).contains(&self.visit_chance) {
            return Err(ScenarioError::InvalidVisitChance(self.visit_chance));
        }
        if self.min_visit_ticks > self.max_visit_ticks {
            return Err(ScenarioError::VisitDuration {
                min: self.min_visit_ticks,
                max: self.max_visit_ticks,
            });
        }
        if !(self.lower_wait_threshold <= self.upper_wait_threshold) {
            return Err(ScenarioError::WaitThresholds {
                lower: self.lower_wait_threshold,
                upper: self.upper_wait_threshold,
            });
        }
        Ok(())
    }
}
