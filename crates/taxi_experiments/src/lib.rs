//! Parallel experimentation framework for taxi dispatch parameter sweeps.
//!
//! Runs many independent simulations with varying fleet, demand and controller
//! settings, summarizes each run, and exports the results for comparison.
//!
//! # Quick Start
//!
//! ```no_run
//! use taxi_experiments::{find_best_result_index, run_parallel_experiments, ParameterSpace};
//!
//! let space = ParameterSpace::grid()
//!     .initial_taxis(vec![20, 40, 60])
//!     .upper_wait_threshold(vec![30.0, 60.0])
//!     .seeds(vec![1, 2, 3]);
//!
//! let parameter_sets = space.generate();
//! let results = run_parallel_experiments(parameter_sets, None)?;
//! let best_idx = find_best_result_index(&results);
//! # Ok::<(), taxi_experiments::ExperimentError>(())
//! ```
//!
//! # Modules
//!
//! - [`parameters`]: parameter space definition (grid search, random sampling)
//! - [`runner`]: parallel simulation execution using rayon
//! - [`metrics`]: metrics extraction from a finished world
//! - [`export`]: JSON / CSV export and ranking

pub mod error;
pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use error::ExperimentError;
pub use export::{export_to_csv, export_to_json, find_best_parameters, find_best_result_index};
pub use metrics::SimulationResult;
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, run_single_simulation};
