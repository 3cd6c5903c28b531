use taxi_core::scenario::ScenarioError;
use thiserror::Error;

/// Failures while running or exporting an experiment.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("{0} resource not found after the run")]
    MissingResource(&'static str),

    #[error("no results to export")]
    NoResults,

    #[error("results length ({results}) doesn't match parameter sets length ({parameter_sets})")]
    LengthMismatch {
        results: usize,
        parameter_sets: usize,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
