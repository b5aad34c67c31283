use std::sync::Arc;

use csv::Reader;
use rover_mission_control::config::{ConfigRegistry, RobotConfig};
use rover_mission_control::export::{json, path_file, trajectory_csv};
use rover_mission_control::service::{DeployRequest, Mission, MissionService, MissionStore};
use rover_mission_control::{TrajectoryPoint, Waypoint};
use tempfile::tempdir;

fn deployed() -> Mission {
    let registry = Arc::new(ConfigRegistry::new(RobotConfig::default()).unwrap());
    let service = MissionService::new(MissionStore::in_memory(), registry);
    service
        .deploy(DeployRequest::new(vec![
            Waypoint::new(0.0, 0.0),
            Waypoint::new(8.0, 0.0),
            Waypoint::new(8.0, 8.0),
        ]))
        .unwrap()
}

#[test]
fn trajectory_csv_reads_back_in_order() {
    let mission = deployed();
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("trajectory.csv");
    trajectory_csv::write_file(&path, &mission.trajectory).unwrap();

    let mut reader = Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), trajectory_csv::HEADER);

    let rows: Vec<TrajectoryPoint> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), mission.trajectory.len());
    assert_eq!(rows.first().unwrap().t, 0.0);
    let last = rows.last().unwrap();
    assert_eq!((last.x, last.y, last.velocity), (8.0, 8.0, 0.0));
    assert!(rows.windows(2).all(|pair| pair[1].t >= pair[0].t));
}

#[test]
fn mission_json_reloads_as_the_same_record() {
    let mission = deployed();
    let dir = tempdir().unwrap();
    let path = dir.path().join("mission.json");
    json::write_pretty(&path, &mission).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"robotConfig\""));
    assert!(text.contains("\"createdAt\""));
    let reloaded: Mission = serde_json::from_str(&text).unwrap();
    assert_eq!(reloaded.id, mission.id);
    assert_eq!(reloaded.waypoints, mission.waypoints);
    assert_eq!(reloaded.trajectory.len(), mission.trajectory.len());
}

#[test]
fn path_file_carries_waypoints_between_editor_and_planner() {
    let mission = deployed();
    let dir = tempdir().unwrap();
    let path = dir.path().join("route.path");
    path_file::save_path_file(&path, &mission.waypoints, 0.5).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["points"][1][0], 16.0);

    let waypoints = path_file::load_path_file(&path, 0.5).unwrap();
    assert_eq!(waypoints, mission.waypoints);
}
