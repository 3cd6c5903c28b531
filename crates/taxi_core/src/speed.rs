use bevy_ecs::prelude::Resource;

const HOURS_PER_DAY: f64 = 24.0;

/// Converts a road speed into whole grid cells per tick.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct SpeedModel {
    cells_per_tick: u32,
}

impl SpeedModel {
    /// `speed_kmh` at `ticks_per_day` ticks per simulated day on cells `cell_size_km` wide.
    /// Rounded to the nearest cell, never below one so taxis always make progress.
    pub fn from_kmh(speed_kmh: f64, ticks_per_day: u64, cell_size_km: f64) -> Self {
        let hours_per_tick = HOURS_PER_DAY / ticks_per_day.max(1) as f64;
        let cells = speed_kmh * hours_per_tick / cell_size_km;
        let cells_per_tick = if cells.is_finite() {
            cells.round().clamp(1.0, u32::MAX as f64) as u32
        } else {
            1
        };
        Self { cells_per_tick }
    }

    pub fn with_cells_per_tick(cells_per_tick: u32) -> Self {
        Self {
            cells_per_tick: cells_per_tick.max(1),
        }
    }

    pub fn cells_per_tick(&self) -> u32 {
        self.cells_per_tick
    }
}
