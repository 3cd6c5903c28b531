//! Result export and analysis utilities.
//!
//! JSON and CSV writers for sweep results, and ranking helpers to pick the
//! best run.

use std::path::Path;

use crate::error::ExperimentError;
use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/ranking.rs"]
mod ranking;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export simulation results to a JSON array.
pub fn export_to_json(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), ExperimentError> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export simulation results with their parameters to CSV.
///
/// `results[i]` belongs to `parameter_sets[i]`; the lengths must match.
pub fn export_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), ExperimentError> {
    writer_utils::ensure_not_empty(results)?;
    if results.len() != parameter_sets.len() {
        return Err(ExperimentError::LengthMismatch {
            results: results.len(),
            parameter_sets: parameter_sets.len(),
        });
    }
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}

/// Index of the run with the lowest average assignment wait, ties broken by
/// the smaller peak fleet.
///
/// Runs without any assignment have no wait to compare and are skipped;
/// returns `None` when no run qualifies.
pub fn find_best_result_index(results: &[SimulationResult]) -> Option<usize> {
    ranking::find_best_index(results)
}

/// Parameter set of the best run, see [`find_best_result_index`].
pub fn find_best_parameters<'a>(
    results: &[SimulationResult],
    parameter_sets: &'a [ParameterSet],
) -> Option<&'a ParameterSet> {
    if results.len() != parameter_sets.len() {
        return None;
    }
    find_best_result_index(results).map(|idx| &parameter_sets[idx])
}
