//! Fleet state and the waiting-time control policy that resizes it.

use std::collections::BTreeMap;

use bevy_ecs::prelude::{Entity, Resource};
use serde::{Deserialize, Serialize};

use crate::ecs::TaxiId;

/// Active taxis keyed by identity, bounded by `[min_size, max_size]`.
#[derive(Debug, Clone, Resource)]
pub struct FleetState {
    active: BTreeMap<TaxiId, Entity>,
    next_id: u32,
    min_size: usize,
    max_size: usize,
}

impl FleetState {
    pub fn new(min_size: usize, max_size: usize) -> Self {
        debug_assert!(min_size <= max_size, "fleet bounds must satisfy min <= max");
        Self {
            active: BTreeMap::new(),
            next_id: 0,
            min_size,
            max_size,
        }
    }

    pub fn size(&self) -> usize {
        self.active.len()
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn can_grow(&self) -> bool {
        self.size() < self.max_size
    }

    pub fn can_shrink(&self) -> bool {
        self.size() > self.min_size
    }

    /// Reserve the next unused taxi identity.
    pub fn allocate_id(&mut self) -> TaxiId {
        let id = TaxiId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: TaxiId, entity: Entity) {
        debug_assert!(self.can_grow(), "fleet would exceed its maximum size");
        self.next_id = self.next_id.max(id.0 + 1);
        self.active.insert(id, entity);
    }

    pub fn remove(&mut self, id: TaxiId) -> Option<Entity> {
        debug_assert!(self.can_shrink(), "fleet would drop below its minimum size");
        self.active.remove(&id)
    }

    pub fn contains(&self, id: TaxiId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn entity(&self, id: TaxiId) -> Option<Entity> {
        self.active.get(&id).copied()
    }

    /// Active taxis in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TaxiId, Entity)> + '_ {
        self.active.iter().map(|(id, entity)| (*id, *entity))
    }
}

/// Waiting-time-at-assignment samples collected since the last fleet evaluation.
#[derive(Debug, Clone, Default, Resource)]
pub struct WaitTimeSamples {
    samples: Vec<u64>,
}

impl WaitTimeSamples {
    pub fn record(&mut self, waiting_ticks: u64) {
        self.samples.push(waiting_ticks);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: u64 = self.samples.iter().sum();
        Some(total as f64 / self.samples.len() as f64)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct FleetControllerConfig {
    /// Ticks between evaluations.
    pub evaluation_period: u64,
    /// Retire a taxi when the rolling average wait falls below this many ticks.
    pub lower_wait_threshold: f64,
    /// Add a taxi when the rolling average wait exceeds this many ticks.
    pub upper_wait_threshold: f64,
}

impl Default for FleetControllerConfig {
    fn default() -> Self {
        Self {
            evaluation_period: crate::clock::DEFAULT_TICKS_PER_DAY,
            lower_wait_threshold: 10.0,
            upper_wait_threshold: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetDecision {
    Grow,
    Shrink,
    Hold,
}

impl FleetControllerConfig {
    /// At most one resize per evaluation; no samples means no signal.
    pub fn decide(&self, average_wait: Option<f64>, fleet: &FleetState) -> FleetDecision {
        let Some(average) = average_wait else {
            return FleetDecision::Hold;
        };
        if average > self.upper_wait_threshold && fleet.can_grow() {
            FleetDecision::Grow
        } else if average < self.lower_wait_threshold && fleet.can_shrink() {
            FleetDecision::Shrink
        } else {
            FleetDecision::Hold
        }
    }
}

/// Outcome of one evaluation, as recorded in telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetAction {
    Added(TaxiId),
    Retired(TaxiId),
    /// A retirement was due but every taxi was busy.
    RetirementSkipped,
    Unchanged,
}
