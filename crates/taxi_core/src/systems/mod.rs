pub mod dispatch;
pub mod fleet_controller;
pub mod metrics;
pub mod movement;
pub mod telemetry_snapshot;
pub mod trip_completed;
pub mod trip_started;
pub mod visit_end;
pub mod visit_request;
