use taxi_core::scenario::MatchingAlgorithmType;

use crate::error::ExperimentError;
use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

fn algorithm_name(algorithm: MatchingAlgorithmType) -> &'static str {
    match algorithm {
        MatchingAlgorithmType::Nearest => "Nearest",
        MatchingAlgorithmType::FirstIdle => "FirstIdle",
    }
}

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), ExperimentError> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "days",
        "width",
        "height",
        "initial_taxis",
        "initial_residents",
        "visit_chance",
        "lower_wait_threshold",
        "upper_wait_threshold",
        "matching_algorithm",
        "ticks_simulated",
        "requests_created",
        "completed_rides",
        "cancelled_requests",
        "assignments",
        "final_fleet_size",
        "peak_fleet_size",
        "min_fleet_size",
        "avg_assignment_wait",
        "median_assignment_wait",
        "p90_assignment_wait",
        "avg_time_to_pickup",
        "total_visits",
        "fleet_changes",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets) {
        let params = &param_set.params;
        wtr.write_record([
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            params.seed.map(|seed| seed.to_string()).unwrap_or_default(),
            param_set.days.to_string(),
            params.width.to_string(),
            params.height.to_string(),
            params.initial_taxis.to_string(),
            params.initial_residents.to_string(),
            params.visit_chance.to_string(),
            params.lower_wait_threshold.to_string(),
            params.upper_wait_threshold.to_string(),
            algorithm_name(params.matching_algorithm).to_string(),
            result.ticks_simulated.to_string(),
            result.requests_created.to_string(),
            result.completed_rides.to_string(),
            result.cancelled_requests.to_string(),
            result.assignments.to_string(),
            result.final_fleet_size.to_string(),
            result.peak_fleet_size.to_string(),
            result.min_fleet_size.to_string(),
            result.avg_assignment_wait.to_string(),
            result.median_assignment_wait.to_string(),
            result.p90_assignment_wait.to_string(),
            result.avg_time_to_pickup.to_string(),
            result.total_visits.to_string(),
            result.fleet_changes.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
