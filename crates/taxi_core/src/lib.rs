pub mod clock;
pub mod dispatch;
pub mod ecs;
pub mod fleet;
pub mod matching;
pub mod rng;
pub mod runner;
pub mod scenario;
pub mod spatial;
pub mod speed;
pub mod systems;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
