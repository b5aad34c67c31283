//! Core units, constants, and geometry value types shared across the rover mission control workspace.

pub mod geometry;

pub use geometry::{TrajectoryPoint, Waypoint};

/// Physical and numeric constants. Field distances are in feet, time in seconds.
pub mod constants {
    /// Distances below this many feet are treated as zero.
    pub const EPSILON_FT: f64 = 1e-6;
    /// Velocities below this many ft/s are treated as zero.
    pub const EPSILON_FT_S: f64 = 1e-6;
    /// Default trajectory sample period (seconds).
    pub const DEFAULT_SAMPLE_PERIOD_S: f64 = 0.05;
}

/// Unit conversion helpers for display.
pub mod units {
    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }
}

/// Planar angle helpers.
pub mod angle {
    use std::f64::consts::{PI, TAU};

    /// Wrap an angle into `(-PI, PI]`.
    #[inline]
    pub fn normalize(theta: f64) -> f64 {
        let wrapped = (theta + PI).rem_euclid(TAU) - PI;
        if wrapped <= -PI { wrapped + TAU } else { wrapped }
    }

    /// Signed shortest rotation taking `from` onto `to`.
    #[inline]
    pub fn shortest_delta(from: f64, to: f64) -> f64 {
        normalize(to - from)
    }

    /// Interpolate between two headings along the shortest arc, `fraction` in `[0, 1]`.
    #[inline]
    pub fn lerp(from: f64, to: f64, fraction: f64) -> f64 {
        normalize(from + shortest_delta(from, to) * fraction)
    }
}

/// Minimal 2D vector helpers to avoid ad-hoc `[f64; 2]` math everywhere.
pub mod vector {
    /// Alias for a 2D vector in feet.
    pub type Vector2 = [f64; 2];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector2) -> f64 {
        v[0].hypot(v[1])
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] - b[0], a[1] - b[1]]
    }

    /// Direction of travel from the origin towards `v`, in radians.
    #[inline]
    pub fn heading(v: &Vector2) -> f64 {
        v[1].atan2(v[0])
    }

    /// Linear interpolation between two points.
    #[inline]
    pub fn lerp(a: &Vector2, b: &Vector2, fraction: f64) -> Vector2 {
        [a[0] + (b[0] - a[0]) * fraction, a[1] + (b[1] - a[1]) * fraction]
    }
}

#[cfg(test)]
mod tests {
    use super::angle;
    use std::f64::consts::PI;

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((angle::normalize(3.0 * PI) - PI).abs() < 1e-12);
        assert!((angle::normalize(-PI) - PI).abs() < 1e-12);
        assert!((angle::normalize(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn lerp_takes_the_short_way_round() {
        let from = PI - 0.1;
        let to = -PI + 0.1;
        let mid = angle::lerp(from, to, 0.5);
        assert!((mid.abs() - PI).abs() < 1e-9);
    }
}
