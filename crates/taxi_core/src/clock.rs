use bevy_ecs::prelude::Resource;

/// Default number of ticks that make up one simulated day.
pub const DEFAULT_TICKS_PER_DAY: u64 = 100;

/// Discrete simulation time. The runner advances it after each scheduled tick;
/// systems only read it.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationClock {
    now: u64,
    ticks_per_day: u64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_DAY)
    }
}

impl SimulationClock {
    pub fn new(ticks_per_day: u64) -> Self {
        debug_assert!(ticks_per_day > 0, "ticks_per_day must be positive");
        Self {
            now: 0,
            ticks_per_day,
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }

    /// 1-based simulated day containing the current tick.
    pub fn day(&self) -> u64 {
        self.now / self.ticks_per_day + 1
    }

    /// Whether the current tick is the last tick of a `period`-tick window.
    pub fn is_period_end(&self, period: u64) -> bool {
        period > 0 && (self.now + 1) % period == 0
    }

    pub fn is_day_end(&self) -> bool {
        self.is_period_end(self.ticks_per_day)
    }

    pub fn advance(&mut self) {
        self.now += 1;
    }
}
