use thiserror::Error;

/// Configuration rejected at startup; the simulation never starts from these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid { width: u32, height: u32 },

    #[error("ticks per day must be positive")]
    ZeroTicksPerDay,

    #[error("fleet evaluation period must be positive")]
    ZeroEvaluationPeriod,

    #[error("taxi speed must be a positive number of km/h, got {0}")]
    InvalidSpeed(f64),

    #[error("cell size must be a positive number of km, got {0}")]
    InvalidCellSize(f64),

    #[error("fleet bounds require min <= max, got min {min} > max {max}")]
    FleetBounds { min: usize, max: usize },

    #[error("initial fleet of {initial} taxis is outside bounds [{min}, {max}]")]
    InitialFleetOutOfBounds {
        initial: usize,
        min: usize,
        max: usize,
    },

    #[error("{residents} residents need unique homes but the grid has only {cells} cells")]
    TooManyResidents { residents: usize, cells: usize },

    #[error("visit chance must be within [0, 1], got {0}")]
    InvalidVisitChance(f64),

    #[error("visit duration requires min <= max, got {min} > {max}")]
    VisitDuration { min: u64, max: u64 },

    #[error("wait thresholds require lower <= upper, got {lower} and {upper}")]
    WaitThresholds { lower: f64, upper: f64 },
}
