//! Persisted mission record.

use chrono::{DateTime, Utc};
use rover_config::RobotConfig;
use rover_core::{TrajectoryPoint, Waypoint};
use serde::{Deserialize, Serialize};

/// Whether a mission is the one handed to the robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    #[default]
    Draft,
    Deployed,
}

/// Waypoints, the trajectory derived from them, and the robot parameters used to derive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub waypoints: Vec<Waypoint>,
    pub trajectory: Vec<TrajectoryPoint>,
    pub robot_config: RobotConfig,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: MissionStatus,
}

impl Mission {
    pub fn is_deployed(&self) -> bool {
        self.status == MissionStatus::Deployed
    }
}
