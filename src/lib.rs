//! Rover mission control: waypoint missions, open-loop trajectories, and their storage.
//!
//! The workspace crates are re-exported here so front-ends (CLI, HTTP, robot-side
//! consumers) depend on a single library.

pub use rover_config as config;
pub use rover_core::{TrajectoryPoint, Waypoint, angle, constants, units, vector};
pub use rover_export as export;
pub use rover_service as service;
pub use rover_store as store;
pub use rover_trajectory as trajectory;

