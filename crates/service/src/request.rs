use rover_config::RobotConfig;
use rover_core::Waypoint;
use serde::{Deserialize, Serialize};

use crate::MissionError;

/// Inbound deploy payload: `{"waypoints": [...], "robotConfig": {...}}`.
///
/// `robotConfig` may be omitted, in which case the service's active configuration is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub waypoints: Vec<Waypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_config: Option<RobotConfig>,
}

impl DeployRequest {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            robot_config: None,
        }
    }

    pub fn with_config(mut self, config: RobotConfig) -> Self {
        self.robot_config = Some(config);
        self
    }

    /// Parse a JSON payload. Type errors (e.g. a string where a number belongs) are malformed requests.
    pub fn from_json(text: &str) -> Result<Self, MissionError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn parses_payload_without_config() {
        let request = DeployRequest::from_json(
            r#"{"waypoints": [{"x": 0, "y": 0}, {"x": 3, "y": 4, "heading": 1.0}]}"#,
        )
        .unwrap();
        assert_eq!(request.waypoints.len(), 2);
        assert_eq!(request.waypoints[1].heading, Some(1.0));
        assert!(request.robot_config.is_none());
    }

    #[test]
    fn parses_payload_with_config() {
        let request = DeployRequest::from_json(
            r#"{
                "waypoints": [{"x": 0, "y": 0}, {"x": 10, "y": 0}],
                "robotConfig": {"length": 2, "width": 2, "maxSpeed": 5, "maxAccel": 2.5, "address": "robot.local:5001"}
            }"#,
        )
        .unwrap();
        let config = request.robot_config.expect("config");
        assert_eq!(config.max_accel, 2.5);
        assert_eq!(config.address, "robot.local:5001");
    }

    #[test]
    fn malformed_numbers_are_validation_errors() {
        let err = DeployRequest::from_json(r#"{"waypoints": [{"x": "ten", "y": 0}]}"#).unwrap_err();
        assert!(matches!(err, MissionError::MalformedRequest(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
