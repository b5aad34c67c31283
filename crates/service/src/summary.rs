use rover_store::{Mission, MissionStatus};
use rover_trajectory::trajectory_stats;
use serde::Serialize;

/// What the robot-side consumer needs to decide whether to start.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionSummary {
    pub id: Option<String>,
    pub status: Option<MissionStatus>,
    pub waypoint_count: usize,
    pub trajectory_points: usize,
    pub duration_s: f64,
    pub path_length_ft: f64,
    pub peak_velocity: f64,
    pub ready_for_execution: bool,
}

impl MissionSummary {
    pub fn of(mission: &Mission) -> Self {
        let stats = trajectory_stats(&mission.trajectory);
        Self {
            id: Some(mission.id.clone()),
            status: Some(mission.status),
            waypoint_count: mission.waypoints.len(),
            trajectory_points: stats.point_count,
            duration_s: stats.duration_s,
            path_length_ft: stats.path_length_ft,
            peak_velocity: stats.peak_velocity,
            ready_for_execution: mission.is_deployed() && stats.point_count >= 2,
        }
    }

    /// Summary reported when nothing is deployed.
    pub fn none() -> Self {
        Self {
            id: None,
            status: None,
            waypoint_count: 0,
            trajectory_points: 0,
            duration_s: 0.0,
            path_length_ft: 0.0,
            peak_velocity: 0.0,
            ready_for_execution: false,
        }
    }
}
