//! Dispatch queue: pending ride requests ordered longest-wait-first.
//!
//! Waiting time is `now - created_at` for every entry, so "longest wait first"
//! is "earliest creation tick first". Requests created in the same tick keep
//! their insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedRequest {
    pub request: Entity,
    pub created_at: u64,
    seq: u64,
}

impl QueuedRequest {
    pub fn waiting_time(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }
}

impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by creation tick.
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default, Resource)]
pub struct DispatchQueue {
    entries: BinaryHeap<QueuedRequest>,
    next_seq: u64,
}

impl DispatchQueue {
    pub fn push(&mut self, request: Entity, created_at: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(QueuedRequest {
            request,
            created_at,
            seq,
        });
    }

    /// Put back an entry popped this tick, keeping its original priority.
    pub fn requeue(&mut self, entry: QueuedRequest) {
        self.entries.push(entry);
    }

    /// Removes the longest-waiting request.
    pub fn pop(&mut self) -> Option<QueuedRequest> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&QueuedRequest> {
        self.entries.peek()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, request: Entity) -> bool {
        self.entries.iter().any(|entry| entry.request == request)
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedRequest> {
        self.entries.iter()
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&QueuedRequest) -> bool,
    {
        self.entries.retain(keep);
    }

    /// Mean waiting time over all queued entries, `0.0` when empty.
    pub fn average_waiting_time(&self, now: u64) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: u64 = self.entries.iter().map(|e| e.waiting_time(now)).sum();
        total as f64 / self.entries.len() as f64
    }
}
