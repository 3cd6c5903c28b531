//! Metrics extraction from simulation results.
//!
//! Summarizes a finished world: ride and cancellation totals, fleet size
//! over time, and assignment wait / pickup time statistics.

use bevy_ecs::prelude::World;
use serde::Serialize;
use taxi_core::clock::SimulationClock;
use taxi_core::ecs::Resident;
use taxi_core::fleet::{FleetAction, FleetState};
use taxi_core::telemetry::SimTelemetry;

use crate::error::ExperimentError;

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Ticks actually simulated.
    pub ticks_simulated: u64,
    pub requests_created: u64,
    pub completed_rides: u64,
    pub cancelled_requests: u64,
    /// Number of dispatch assignments (wait samples).
    pub assignments: usize,
    pub final_fleet_size: usize,
    pub peak_fleet_size: usize,
    pub min_fleet_size: usize,
    /// Average ticks from request to assignment.
    pub avg_assignment_wait: f64,
    pub median_assignment_wait: f64,
    pub p90_assignment_wait: f64,
    /// Average ticks from assignment to pickup over completed rides.
    pub avg_time_to_pickup: f64,
    /// Outbound trips that reached the host.
    pub total_visits: u64,
    /// Fleet evaluations that added or retired a taxi.
    pub fleet_changes: usize,
}

impl SimulationResult {
    /// Average, median and 90th percentile of `values`; zeros when empty.
    pub(crate) fn calculate_stats(values: &[u64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
        } else {
            sorted[mid] as f64
        };
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)] as f64;

        (avg, median, p90)
    }
}

/// Extract metrics from a completed simulation world.
pub fn extract_metrics(world: &mut World) -> Result<SimulationResult, ExperimentError> {
    let total_visits = world
        .query::<&Resident>()
        .iter(world)
        .map(|resident| u64::from(resident.visits_made))
        .sum();

    let ticks_simulated = world
        .get_resource::<SimulationClock>()
        .ok_or(ExperimentError::MissingResource("SimulationClock"))?
        .now();
    let final_fleet_size = world
        .get_resource::<FleetState>()
        .ok_or(ExperimentError::MissingResource("FleetState"))?
        .size();
    let telemetry = world
        .get_resource::<SimTelemetry>()
        .ok_or(ExperimentError::MissingResource("SimTelemetry"))?;

    let initial_fleet_size = telemetry
        .fleet_evaluations
        .first()
        .map_or(final_fleet_size, |evaluation| evaluation.fleet_size_before);
    let (peak_fleet_size, min_fleet_size) = telemetry
        .fleet_evaluations
        .iter()
        .map(|evaluation| evaluation.fleet_size_after)
        .fold((initial_fleet_size, initial_fleet_size), |(peak, min), size| {
            (peak.max(size), min.min(size))
        });
    let fleet_changes = telemetry
        .fleet_evaluations
        .iter()
        .filter(|evaluation| {
            matches!(
                evaluation.action,
                FleetAction::Added(_) | FleetAction::Retired(_)
            )
        })
        .count();

    let waits: Vec<u64> = telemetry
        .assignments
        .iter()
        .map(|assignment| assignment.waiting_ticks)
        .collect();
    let (avg_assignment_wait, median_assignment_wait, p90_assignment_wait) =
        SimulationResult::calculate_stats(&waits);

    let pickup_times: Vec<u64> = telemetry
        .completed_rides
        .iter()
        .map(|ride| ride.time_to_pickup())
        .collect();
    let (avg_time_to_pickup, _, _) = SimulationResult::calculate_stats(&pickup_times);

    Ok(SimulationResult {
        ticks_simulated,
        requests_created: telemetry.requests_created_total,
        completed_rides: telemetry.completed_rides_total,
        cancelled_requests: telemetry.requests_cancelled_total,
        assignments: waits.len(),
        final_fleet_size,
        peak_fleet_size,
        min_fleet_size,
        avg_assignment_wait,
        median_assignment_wait,
        p90_assignment_wait,
        avg_time_to_pickup,
        total_visits,
        fleet_changes,
    })
}
