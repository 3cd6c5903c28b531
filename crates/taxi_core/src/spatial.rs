//! Spatial operations: the bounded city grid, Manhattan distances and
//! city-block stepping.
//!
//! This module provides:
//!
//! - **GridCell**: an integer `(x, y)` cell in `[0, width) × [0, height)`
//! - **Grid**: grid bounds resource plus random placement helpers
//! - **Distance calculations**: Manhattan distance between cells
//! - **Movement**: advancing up to `speed` cells toward a target
//!
//! The grid does not wrap and has no obstacles; any number of agents may share a cell.

use std::fmt;

use bevy_ecs::prelude::Resource;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for GridCell {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// City-block distance, consistent with [`step_toward`].
pub fn manhattan_distance(a: GridCell, b: GridCell) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Advance from `from` toward `to` by at most `speed` unit steps.
///
/// Each unit step reduces the larger of |Δx| and |Δy| (x first on ties), so the
/// path stays close to the diagonal. The target is reached exactly when the
/// remaining Manhattan distance is at most `speed`; it is never overshot.
pub fn step_toward(from: GridCell, to: GridCell, speed: u32) -> GridCell {
    let mut current = from;
    for _ in 0..speed {
        let dx = current.x.abs_diff(to.x);
        let dy = current.y.abs_diff(to.y);
        if dx == 0 && dy == 0 {
            break;
        }
        if dx >= dy {
            current.x = if current.x < to.x {
                current.x + 1
            } else {
                current.x - 1
            };
        } else {
            current.y = if current.y < to.y {
                current.y + 1
            } else {
                current.y - 1
            };
        }
    }
    current
}

/// Bounds of the position space. Inserted once at scenario build; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Row-major cell for a flat index in `0..cell_count()`.
    pub fn cell_at(&self, index: usize) -> GridCell {
        debug_assert!(index < self.cell_count(), "cell index out of range");
        let width = self.width as usize;
        GridCell::new((index % width) as u32, (index / width) as u32)
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> GridCell {
        GridCell::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }

    /// Move an agent one tick toward `target`.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint or the result lies outside the grid. Movement between
    /// in-bounds cells cannot leave the grid, so this only fires on corrupted state.
    pub fn advance(&self, from: GridCell, target: GridCell, speed: u32) -> GridCell {
        assert!(
            self.contains(from) && self.contains(target),
            "movement endpoints out of bounds: {from} -> {target} on {}x{} grid",
            self.width,
            self.height
        );
        let next = step_toward(from, target, speed);
        assert!(self.contains(next), "movement left the grid at {next}");
        next
    }
}
