//! Telemetry / KPIs: completed rides, assignments, fleet evaluations and
//! periodic state snapshots.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};
use serde::{Deserialize, Serialize};

use crate::ecs::{ResidentId, ResidentState, TaxiId, TaxiState, TripLeg};
use crate::fleet::FleetAction;
use crate::spatial::GridCell;

/// One completed ride, recorded when the taxi reaches the destination.
/// Timestamps are simulation ticks; use the helper methods for derived KPIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedRideRecord {
    pub taxi: TaxiId,
    pub resident: ResidentId,
    pub host: ResidentId,
    pub leg: TripLeg,
    pub requested_at: u64,
    pub assigned_at: u64,
    pub pickup_at: u64,
    pub completed_at: u64,
}

impl CompletedRideRecord {
    /// Time from request creation to taxi assignment.
    pub fn time_to_assign(&self) -> u64 {
        self.assigned_at.saturating_sub(self.requested_at)
    }

    /// Time from assignment to pickup.
    pub fn time_to_pickup(&self) -> u64 {
        self.pickup_at.saturating_sub(self.assigned_at)
    }

    /// Time from pickup to drop-off (passenger on board).
    pub fn ride_duration(&self) -> u64 {
        self.completed_at.saturating_sub(self.pickup_at)
    }
}

/// One dispatch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub tick: u64,
    pub taxi: TaxiId,
    pub resident: ResidentId,
    pub waiting_ticks: u64,
    /// Manhattan distance from the taxi to the pickup at assignment.
    pub pickup_distance: u32,
}

/// Outcome of one fleet controller run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetEvaluation {
    pub tick: u64,
    pub day: u64,
    pub samples: usize,
    /// `None` when no assignments happened during the period.
    pub average_wait: Option<f64>,
    pub fleet_size_before: usize,
    pub fleet_size_after: usize,
    pub action: FleetAction,
}

/// Collects simulation telemetry over the whole run.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub requests_created_total: u64,
    pub requests_cancelled_total: u64,
    pub completed_rides_total: u64,
    pub completed_rides: Vec<CompletedRideRecord>,
    pub assignments: Vec<AssignmentRecord>,
    pub fleet_evaluations: Vec<FleetEvaluation>,
}

impl SimTelemetry {
    /// Mean assignment wait over every assignment so far.
    pub fn average_assignment_wait(&self) -> Option<f64> {
        if self.assignments.is_empty() {
            return None;
        }
        let total: u64 = self.assignments.iter().map(|a| a.waiting_ticks).sum();
        Some(total as f64 / self.assignments.len() as f64)
    }
}

/// Per-tick aggregates, refreshed at the end of every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Resource)]
pub struct SimMetrics {
    pub tick: u64,
    pub taxi_count: usize,
    pub idle_taxis: usize,
    pub pending_requests: usize,
    /// Mean waiting time of queued requests.
    pub average_pending_wait: f64,
    /// Mean assignment wait collected since the last fleet evaluation.
    pub rolling_average_wait: Option<f64>,
    pub completed_rides_total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxiSnapshot {
    #[serde(skip)]
    pub entity: Entity,
    pub id: TaxiId,
    pub cell: GridCell,
    pub state: TaxiState,
    pub rides_completed: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidentSnapshot {
    #[serde(skip)]
    pub entity: Entity,
    pub id: ResidentId,
    pub cell: GridCell,
    pub state: ResidentState,
}

/// Aggregated counts at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimCounts {
    pub taxis_idle: usize,
    pub taxis_to_pickup: usize,
    pub taxis_to_destination: usize,
    pub residents_idle: usize,
    pub residents_waiting: usize,
    pub residents_in_transit: usize,
    pub residents_visiting: usize,
    pub residents_hosting: usize,
    pub pending_requests: usize,
    pub completed_rides_total: u64,
    pub cancelled_requests_total: u64,
}

impl SimCounts {
    pub fn add_taxi(&mut self, state: TaxiState) {
        match state {
            TaxiState::Idle => self.taxis_idle += 1,
            TaxiState::ToPickup => self.taxis_to_pickup += 1,
            TaxiState::ToDestination => self.taxis_to_destination += 1,
        }
    }

    pub fn add_resident(&mut self, state: ResidentState) {
        match state {
            ResidentState::Idle => self.residents_idle += 1,
            ResidentState::Waiting => self.residents_waiting += 1,
            ResidentState::InTransit => self.residents_in_transit += 1,
            ResidentState::Visiting => self.residents_visiting += 1,
            ResidentState::Hosting => self.residents_hosting += 1,
        }
    }

    pub fn taxi_total(&self) -> usize {
        self.taxis_idle + self.taxis_to_pickup + self.taxis_to_destination
    }
}

/// Snapshot of simulation state at a specific tick.
#[derive(Debug, Clone, Serialize)]
pub struct SimSnapshot {
    pub tick: u64,
    pub metrics: SimMetrics,
    pub counts: SimCounts,
    pub taxis: Vec<TaxiSnapshot>,
    pub residents: Vec<ResidentSnapshot>,
}

/// Snapshot capture configuration.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimSnapshotConfig {
    pub interval_ticks: u64,
    pub max_snapshots: usize,
}

impl Default for SimSnapshotConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 10,
            max_snapshots: 1_000,
        }
    }
}

/// Rolling snapshot buffer.
#[derive(Debug, Default, Resource)]
pub struct SimSnapshots {
    pub snapshots: VecDeque<SimSnapshot>,
    pub last_snapshot_at: Option<u64>,
}
