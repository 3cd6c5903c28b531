#![allow(dead_code)]

use bevy_ecs::prelude::World;
use taxi_core::clock::SimulationClock;
use taxi_core::fleet::{FleetControllerConfig, FleetState};
use taxi_core::matching::MatchingAlgorithmResource;
use taxi_core::rng::SimRng;
use taxi_core::scenario::{
    create_first_idle_matching, create_nearest_matching, MatchingAlgorithmType, VisitConfig,
};
use taxi_core::speed::SpeedModel;
use taxi_core::test_helpers::{create_test_world, TEST_SEED};

/// Builder configuration for reproducible hand-placed test worlds.
#[derive(Clone, Debug)]
pub struct TestWorldConfig {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub ticks_per_day: u64,
    pub cells_per_tick: u32,
    pub min_fleet_size: usize,
    pub max_fleet_size: usize,
    pub evaluation_period: Option<u64>,
    pub lower_wait_threshold: f64,
    pub upper_wait_threshold: f64,
    pub visit: VisitConfig,
    pub matching: MatchingAlgorithmType,
}

impl Default for TestWorldConfig {
    fn default() -> Self {
        Self {
            seed: TEST_SEED,
            width: 20,
            height: 20,
            ticks_per_day: 100,
            cells_per_tick: 1,
            min_fleet_size: 0,
            max_fleet_size: 100,
            evaluation_period: None,
            lower_wait_threshold: 10.0,
            upper_wait_threshold: 60.0,
            visit: VisitConfig {
                visit_chance: 0.0,
                ..Default::default()
            },
            matching: MatchingAlgorithmType::Nearest,
        }
    }
}

/// Helper that populates the ECS world with all shared resources used in integration tests.
/// Agents are added afterwards with the builders in `support::entities`.
#[derive(Debug, Default)]
pub struct TestWorldBuilder {
    config: TestWorldConfig,
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_ticks_per_day(mut self, ticks: u64) -> Self {
        self.config.ticks_per_day = ticks;
        self
    }

    /// Movement speed shared by every taxi spawned afterwards.
    pub fn with_cells_per_tick(mut self, cells: u32) -> Self {
        self.config.cells_per_tick = cells;
        self
    }

    pub fn with_fleet_bounds(mut self, min: usize, max: usize) -> Self {
        self.config.min_fleet_size = min;
        self.config.max_fleet_size = max;
        self
    }

    pub fn with_evaluation_period(mut self, ticks: u64) -> Self {
        self.config.evaluation_period = Some(ticks);
        self
    }

    pub fn with_wait_thresholds(mut self, lower: f64, upper: f64) -> Self {
        self.config.lower_wait_threshold = lower;
        self.config.upper_wait_threshold = upper;
        self
    }

    pub fn with_visit_chance(mut self, chance: f64) -> Self {
        self.config.visit.visit_chance = chance;
        self
    }

    /// Fixed visit length in ticks.
    pub fn with_visit_ticks(mut self, ticks: u64) -> Self {
        self.config.visit.min_visit_ticks = ticks;
        self.config.visit.max_visit_ticks = ticks;
        self
    }

    pub fn with_max_wait_ticks(mut self, ticks: u64) -> Self {
        self.config.visit.max_wait_ticks = Some(ticks);
        self
    }

    pub fn with_matching(mut self, matching: MatchingAlgorithmType) -> Self {
        self.config.matching = matching;
        self
    }

    /// Build the ECS world with the configured resources.
    pub fn build(self) -> World {
        let TestWorldConfig {
            seed,
            width,
            height,
            ticks_per_day,
            cells_per_tick,
            min_fleet_size,
            max_fleet_size,
            evaluation_period,
            lower_wait_threshold,
            upper_wait_threshold,
            visit,
            matching,
        } = self.config;

        let mut world = create_test_world(width, height);
        world.insert_resource(SimulationClock::new(ticks_per_day));
        world.insert_resource(SimRng::seeded(seed));
        world.insert_resource(SpeedModel::with_cells_per_tick(cells_per_tick));
        world.insert_resource(FleetState::new(min_fleet_size, max_fleet_size));
        world.insert_resource(FleetControllerConfig {
            evaluation_period: evaluation_period.unwrap_or(ticks_per_day),
            lower_wait_threshold,
            upper_wait_threshold,
        });
        world.insert_resource(visit);
        let matching: MatchingAlgorithmResource = match matching {
            MatchingAlgorithmType::Nearest => create_nearest_matching(),
            MatchingAlgorithmType::FirstIdle => create_first_idle_matching(),
        };
        world.insert_resource(matching);
        world
    }
}
