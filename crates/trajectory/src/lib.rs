//! Open-loop trajectory generation for waypoint missions.

pub mod generator;
pub mod profile;

use rover_core::TrajectoryPoint;
use rover_core::vector;
use serde::Serialize;

pub use generator::{TrajectoryError, TrajectoryGenerator, generate, validate_inputs};
pub use profile::VelocityProfile;

/// Summary metrics for a generated trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryStats {
    pub point_count: usize,
    pub duration_s: f64,
    pub path_length_ft: f64,
    pub peak_velocity: f64,
}

/// Summarise a trajectory. An empty slice yields all zeros.
pub fn trajectory_stats(points: &[TrajectoryPoint]) -> TrajectoryStats {
    let path_length_ft = points
        .windows(2)
        .map(|pair| vector::norm(&vector::sub(&pair[1].position(), &pair[0].position())))
        .sum();
    TrajectoryStats {
        point_count: points.len(),
        duration_s: points.last().map(|p| p.t).unwrap_or_default(),
        path_length_ft,
        peak_velocity: points.iter().map(|p| p.velocity).fold(0.0, f64::max),
    }
}
