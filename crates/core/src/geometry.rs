//! Waypoint and trajectory sample value types.

use serde::{Deserialize, Serialize};

use crate::vector::Vector2;

/// Field position the robot must visit, in visit order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Feet.
    pub x: f64,
    /// Feet.
    pub y: f64,
    /// Optional heading to hold at this waypoint (radians).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl Waypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, heading: None }
    }

    pub fn with_heading(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading: Some(heading),
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        [self.x, self.y]
    }

    /// True when every coordinate (and the heading, if set) is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.heading.is_none_or(f64::is_finite)
    }
}

/// One time-stamped sample of the open-loop reference trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
    /// Speed along the path (ft/s, never negative).
    pub velocity: f64,
    /// Radians.
    pub heading: f64,
    /// Seconds since trajectory start.
    pub t: f64,
}

impl TrajectoryPoint {
    #[inline]
    pub fn position(&self) -> Vector2 {
        [self.x, self.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_is_omitted_when_unset() {
        let json = serde_json::to_string(&Waypoint::new(1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0}"#);

        let parsed: Waypoint = serde_json::from_str(r#"{"x":1,"y":2,"heading":0.5}"#).unwrap();
        assert_eq!(parsed, Waypoint::with_heading(1.0, 2.0, 0.5));
    }

    #[test]
    fn non_finite_heading_is_rejected() {
        assert!(!Waypoint::with_heading(0.0, 0.0, f64::NAN).is_finite());
        assert!(Waypoint::new(0.0, 0.0).is_finite());
    }
}
