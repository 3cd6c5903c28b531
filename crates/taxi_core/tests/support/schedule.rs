#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use taxi_core::runner::{run_tick, run_ticks, run_ticks_with_hook, simulation_schedule};

/// Helper that owns a reusable `Schedule` so tests can step tick by tick.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_tick(world, &mut self.schedule)
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> u64 {
        run_ticks(world, &mut self.schedule, ticks)
    }

    /// Run `ticks` ticks, calling `check` after each.
    pub fn run_checked<F>(&mut self, world: &mut World, ticks: u64, check: F) -> u64
    where
        F: FnMut(&World, u64),
    {
        run_ticks_with_hook(world, &mut self.schedule, ticks, check)
    }
}
