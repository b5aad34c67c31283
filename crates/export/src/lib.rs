//! Export helpers for path files, trajectory CSV, and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Errors raised while reading or writing exported artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scale must be a positive number of feet per unit, got {0}")]
    InvalidScale(f64),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Waypoint files as saved by the field path editor.
pub mod path_file {
    use std::fs::File;
    use std::io::{BufReader, Write};
    use std::path::Path;

    use rover_core::Waypoint;
    use serde::{Deserialize, Serialize};

    use super::{ExportError, writer_for_path};

    /// On-disk layout: `{"points": [[x, y], ...]}` in editor units.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct PathFile {
        #[serde(default)]
        pub points: Vec<[f64; 2]>,
    }

    impl PathFile {
        /// Convert editor units to feet, `scale` feet per unit.
        pub fn to_waypoints(&self, scale: f64) -> Result<Vec<Waypoint>, ExportError> {
            check_scale(scale)?;
            Ok(self
                .points
                .iter()
                .map(|[x, y]| Waypoint::new(x * scale, y * scale))
                .collect())
        }

        pub fn from_waypoints(waypoints: &[Waypoint], scale: f64) -> Result<Self, ExportError> {
            check_scale(scale)?;
            Ok(Self {
                points: waypoints.iter().map(|w| [w.x / scale, w.y / scale]).collect(),
            })
        }
    }

    fn check_scale(scale: f64) -> Result<(), ExportError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ExportError::InvalidScale(scale));
        }
        Ok(())
    }

    /// Read a `.path` file and scale its points into feet.
    pub fn load_path_file<P: AsRef<Path>>(
        path: P,
        scale: f64,
    ) -> Result<Vec<Waypoint>, ExportError> {
        let reader = BufReader::new(File::open(path)?);
        let file: PathFile = serde_json::from_reader(reader)?;
        file.to_waypoints(scale)
    }

    /// Write waypoints as a `.path` file. Headings are not part of the format and are dropped.
    pub fn save_path_file<P: AsRef<Path>>(
        path: P,
        waypoints: &[Waypoint],
        scale: f64,
    ) -> Result<(), ExportError> {
        let file = PathFile::from_waypoints(waypoints, scale)?;
        let mut writer = writer_for_path(path.as_ref())?;
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Trajectory CSV for offline replay and plotting.
pub mod trajectory_csv {
    use std::io::Write;
    use std::path::Path;

    use rover_core::TrajectoryPoint;

    use super::{ExportError, writer_for_path};

    pub const HEADER: [&str; 5] = ["x", "y", "velocity", "heading", "t"];

    /// Serialize trajectory samples, header first, in sample order.
    pub fn write_to(writer: &mut dyn Write, points: &[TrajectoryPoint]) -> Result<(), ExportError> {
        let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        csv.write_record(HEADER)?;
        for point in points {
            csv.serialize(point)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write trajectory samples to `path` (`-` for stdout).
    pub fn write_file(path: &Path, points: &[TrajectoryPoint]) -> Result<(), ExportError> {
        let mut writer = writer_for_path(path)?;
        write_to(&mut writer, points)?;
        writer.flush()?;
        Ok(())
    }
}

/// Pretty JSON export of any serializable record, typically a whole mission.
pub mod json {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;

    use super::{ExportError, writer_for_path};

    pub fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
        let mut writer = writer_for_path(path)?;
        serde_json::to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_core::{TrajectoryPoint, Waypoint};

    #[test]
    fn editor_file_scales_into_feet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.path");
        fs::write(&path, r#"{"points": [[0, 0], [100, 0], [100, 50]]}"#).unwrap();

        let waypoints = path_file::load_path_file(&path, 0.5).expect("path file");
        assert_eq!(waypoints.len(), 3);
        assert_eq!(waypoints[1], Waypoint::new(50.0, 0.0));
        assert_eq!(waypoints[2], Waypoint::new(50.0, 25.0));
    }

    #[test]
    fn rejects_zero_scale() {
        let err = path_file::PathFile::default().to_waypoints(0.0).unwrap_err();
        assert!(matches!(err, ExportError::InvalidScale(s) if s == 0.0));
    }

    #[test]
    fn csv_starts_with_header() {
        let points = [
            TrajectoryPoint {
                x: 0.0,
                y: 0.0,
                velocity: 0.0,
                heading: 0.0,
                t: 0.0,
            },
            TrajectoryPoint {
                x: 0.5,
                y: 0.0,
                velocity: 1.0,
                heading: 0.0,
                t: 0.5,
            },
        ];
        let mut buffer = Vec::new();
        trajectory_csv::write_to(&mut buffer, &points).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y,velocity,heading,t"));
        assert_eq!(lines.next(), Some("0.0,0.0,0.0,0.0,0.0"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn json_export_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/waypoint.json");
        json::write_pretty(&path, &Waypoint::new(1.0, 2.0)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"x\": 1.0"));
    }
}
