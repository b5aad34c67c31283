//! Waypoint list to time-sampled trajectory.
//!
//! Each consecutive waypoint pair is a straight segment. Junction speeds are
//! limited by the turn angle and made mutually reachable by a forward and a
//! backward pass, then every segment is sampled from its own
//! [`VelocityProfile`] and the pieces are chained on a single clock.

use rover_config::{ParameterError, RobotConfig};
use rover_core::constants::{DEFAULT_SAMPLE_PERIOD_S, EPSILON_FT};
use rover_core::vector::{self, Vector2};
use rover_core::{TrajectoryPoint, Waypoint, angle};
use thiserror::Error;

use crate::profile::{VelocityProfile, snap_to_rest};

/// Reasons a waypoint list and configuration cannot produce a trajectory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("robot configuration rejected: {0}")]
    Config(#[from] ParameterError),
    #[error("waypoint {index} has a non-finite coordinate or heading")]
    NonFiniteWaypoint { index: usize },
    #[error("at least 2 distinct waypoints are required, got {distinct}")]
    TooFewWaypoints { distinct: usize },
    #[error("sample period must be a positive number of seconds, got {0}")]
    InvalidSamplePeriod(f64),
}

/// Trajectory generator with a fixed sample period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryGenerator {
    sample_period_s: f64,
}

impl Default for TrajectoryGenerator {
    fn default() -> Self {
        Self {
            sample_period_s: DEFAULT_SAMPLE_PERIOD_S,
        }
    }
}

/// Generate a trajectory with the default sample period.
pub fn generate(
    waypoints: &[Waypoint],
    config: &RobotConfig,
) -> Result<Vec<TrajectoryPoint>, TrajectoryError> {
    TrajectoryGenerator::default().generate(waypoints, config)
}

/// Check a waypoint list and configuration without generating anything.
pub fn validate_inputs(
    waypoints: &[Waypoint],
    config: &RobotConfig,
) -> Result<(), TrajectoryError> {
    config.validate()?;
    if let Some(index) = waypoints.iter().position(|w| !w.is_finite()) {
        return Err(TrajectoryError::NonFiniteWaypoint { index });
    }
    let distinct = distinct_count(waypoints);
    if distinct < 2 {
        return Err(TrajectoryError::TooFewWaypoints { distinct });
    }
    Ok(())
}

/// Number of waypoints left after collapsing consecutive coincident ones.
fn distinct_count(waypoints: &[Waypoint]) -> usize {
    if waypoints.is_empty() {
        return 0;
    }
    1 + waypoints
        .windows(2)
        .filter(|pair| {
            vector::norm(&vector::sub(&pair[1].position(), &pair[0].position())) > EPSILON_FT
        })
        .count()
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: Vector2,
    end: Vector2,
    length: f64,
    direction: f64,
    start_heading: f64,
    end_heading: f64,
}

impl Segment {
    fn is_zero_length(&self) -> bool {
        self.length <= EPSILON_FT
    }
}

impl TrajectoryGenerator {
    pub fn new(sample_period_s: f64) -> Result<Self, TrajectoryError> {
        if !sample_period_s.is_finite() || sample_period_s <= 0.0 {
            return Err(TrajectoryError::InvalidSamplePeriod(sample_period_s));
        }
        Ok(Self { sample_period_s })
    }

    pub fn sample_period_s(&self) -> f64 {
        self.sample_period_s
    }

    /// Convert an ordered waypoint list into a time-sampled trajectory.
    ///
    /// Pure and deterministic: identical inputs always give identical output.
    pub fn generate(
        &self,
        waypoints: &[Waypoint],
        config: &RobotConfig,
    ) -> Result<Vec<TrajectoryPoint>, TrajectoryError> {
        validate_inputs(waypoints, config)?;

        let segments = build_segments(waypoints);
        let junctions = junction_speeds(&segments, config);
        let dt = self.sample_period_s;

        let first = &segments[0];
        let mut points = vec![TrajectoryPoint {
            x: first.start[0],
            y: first.start[1],
            velocity: 0.0,
            heading: first.start_heading,
            t: 0.0,
        }];
        let mut clock = 0.0;

        for (i, segment) in segments.iter().enumerate() {
            if segment.is_zero_length() {
                // in-place stop, possibly turning to a new heading
                points.push(TrajectoryPoint {
                    x: segment.end[0],
                    y: segment.end[1],
                    velocity: 0.0,
                    heading: segment.end_heading,
                    t: clock,
                });
                continue;
            }

            let profile = VelocityProfile::plan(
                segment.length,
                junctions[i],
                junctions[i + 1],
                config.max_speed,
                config.max_accel,
            );
            let duration = profile.duration();

            let mut k = 1u64;
            loop {
                let local = k as f64 * dt;
                if local >= duration - 0.5 * dt {
                    break;
                }
                points.push(sample(segment, &profile, local, clock));
                k += 1;
            }
            points.push(TrajectoryPoint {
                x: segment.end[0],
                y: segment.end[1],
                velocity: profile.exit_velocity,
                heading: segment.end_heading,
                t: clock + duration,
            });
            clock += duration;
        }

        Ok(points)
    }
}

fn sample(segment: &Segment, profile: &VelocityProfile, local: f64, clock: f64) -> TrajectoryPoint {
    let fraction = (profile.distance_at(local) / segment.length).clamp(0.0, 1.0);
    let [x, y] = vector::lerp(&segment.start, &segment.end, fraction);
    TrajectoryPoint {
        x,
        y,
        velocity: profile.velocity_at(local),
        heading: angle::lerp(segment.start_heading, segment.end_heading, fraction),
        t: clock + local,
    }
}

fn build_segments(waypoints: &[Waypoint]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = waypoints
        .windows(2)
        .map(|pair| {
            let start = pair[0].position();
            let end = pair[1].position();
            let delta = vector::sub(&end, &start);
            Segment {
                start,
                end,
                length: vector::norm(&delta),
                direction: vector::heading(&delta),
                start_heading: 0.0,
                end_heading: 0.0,
            }
        })
        .collect();

    // Zero-length segments borrow the next real direction of travel, or the previous one at the tail.
    let mut next_real: Option<f64> = None;
    let mut borrowed: Vec<Option<f64>> = vec![None; segments.len()];
    for (i, segment) in segments.iter().enumerate().rev() {
        if segment.is_zero_length() {
            borrowed[i] = next_real;
        } else {
            next_real = Some(segment.direction);
        }
    }
    let mut previous_real = 0.0;
    for (segment, borrowed) in segments.iter_mut().zip(borrowed) {
        if segment.is_zero_length() {
            segment.direction = borrowed.unwrap_or(previous_real);
        } else {
            previous_real = segment.direction;
        }
    }

    for (i, segment) in segments.iter_mut().enumerate() {
        segment.start_heading = waypoints[i]
            .heading
            .map_or(segment.direction, angle::normalize);
        segment.end_heading = waypoints[i + 1]
            .heading
            .map_or(segment.direction, angle::normalize);
    }
    segments
}

/// Speed limit at every waypoint after the forward and backward reachability passes.
fn junction_speeds(segments: &[Segment], config: &RobotConfig) -> Vec<f64> {
    let n = segments.len() + 1;
    let a = config.max_accel;
    let mut limits = vec![0.0; n];

    for i in 1..n - 1 {
        let incoming = &segments[i - 1];
        let outgoing = &segments[i];
        if incoming.is_zero_length() || outgoing.is_zero_length() {
            continue;
        }
        let turn = angle::shortest_delta(incoming.direction, outgoing.direction).abs();
        limits[i] = config.max_speed * turn.cos().max(0.0);
    }

    for i in 0..n - 1 {
        let reachable = (limits[i] * limits[i] + 2.0 * a * segments[i].length).sqrt();
        limits[i + 1] = limits[i + 1].min(reachable);
    }
    for i in (0..n - 1).rev() {
        let reachable = (limits[i + 1] * limits[i + 1] + 2.0 * a * segments[i].length).sqrt();
        limits[i] = limits[i].min(reachable);
    }
    limits.into_iter().map(snap_to_rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn config(max_speed: f64, max_accel: f64) -> RobotConfig {
        RobotConfig {
            length: 2.0,
            width: 2.0,
            max_speed,
            max_accel,
            address: String::new(),
        }
    }

    #[test]
    fn counts_distinct_waypoints() {
        let pts = [
            Waypoint::new(0.0, 0.0),
            Waypoint::new(0.0, 0.0),
            Waypoint::new(1.0, 0.0),
            Waypoint::new(1.0, 0.0 + 1e-9),
        ];
        assert_eq!(distinct_count(&pts), 2);
        assert_eq!(distinct_count(&[]), 0);
    }

    #[test]
    fn right_angle_corner_stops_the_robot() {
        let pts = [
            Waypoint::new(0.0, 0.0),
            Waypoint::new(10.0, 0.0),
            Waypoint::new(10.0, 10.0),
        ];
        let segments = build_segments(&pts);
        let limits = junction_speeds(&segments, &config(5.0, 2.5));
        assert!(limits[1].abs() < 1e-9);
    }

    #[test]
    fn straight_continuation_keeps_speed() {
        let pts = [
            Waypoint::new(0.0, 0.0),
            Waypoint::new(5.0, 0.0),
            Waypoint::new(10.0, 0.0),
        ];
        let segments = build_segments(&pts);
        let limits = junction_speeds(&segments, &config(5.0, 2.5));
        assert!((limits[1] - 5.0).abs() < 1e-9);
        assert_eq!(limits[0], 0.0);
        assert_eq!(limits[2], 0.0);
    }

    #[test]
    fn zero_length_segment_takes_next_direction() {
        let pts = [
            Waypoint::new(0.0, 0.0),
            Waypoint::new(0.0, 0.0),
            Waypoint::new(0.0, 4.0),
        ];
        let segments = build_segments(&pts);
        assert!((segments[0].direction - FRAC_PI_2).abs() < 1e-12);
        assert!((segments[0].start_heading - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_sample_period() {
        assert!(TrajectoryGenerator::new(0.0).is_err());
        assert!(TrajectoryGenerator::new(f64::INFINITY).is_err());
        assert_eq!(TrajectoryGenerator::new(0.1).unwrap().sample_period_s(), 0.1);
    }

    #[test]
    fn explicit_headings_are_wrapped_like_interpolated_ones() {
        let pts = [
            Waypoint::with_heading(0.0, 0.0, 7.0),
            Waypoint::with_heading(10.0, 0.0, 7.0),
        ];
        let points = TrajectoryGenerator::default()
            .generate(&pts, &config(5.0, 2.5))
            .unwrap();
        let wrapped = angle::normalize(7.0);
        for point in &points {
            assert!((point.heading - wrapped).abs() < 1e-12, "heading {}", point.heading);
        }
    }

    #[test]
    fn perpendicular_corner_limit_is_exactly_zero() {
        let pts = [
            Waypoint::new(0.0, 0.0),
            Waypoint::new(0.0, 10.0),
            Waypoint::new(-10.0, 10.0),
        ];
        let limits = junction_speeds(&build_segments(&pts), &config(5.0, 2.5));
        assert_eq!(limits[1], 0.0);
    }
}
