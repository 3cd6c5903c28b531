pub mod entities;
pub mod invariants;
pub mod schedule;
pub mod world;
