//! Trapezoidal and triangular velocity profiles along a single straight segment.

use rover_core::constants::EPSILON_FT_S;

/// Accelerate, cruise, and decelerate plan for one segment.
///
/// When the segment is too short to reach the speed cap the cruise phase is
/// empty and the profile degenerates into a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityProfile {
    pub distance: f64,
    pub entry_velocity: f64,
    pub peak_velocity: f64,
    pub exit_velocity: f64,
    pub acceleration: f64,
    pub accel_time_s: f64,
    pub cruise_time_s: f64,
    pub decel_time_s: f64,
    accel_distance: f64,
    cruise_distance: f64,
}

impl VelocityProfile {
    /// Plan a profile covering `distance` feet.
    ///
    /// `entry` and `exit` are capped at `max_speed`, and `exit` is pulled into the
    /// range reachable from `entry` under `max_accel` over the distance.
    pub fn plan(distance: f64, entry: f64, exit: f64, max_speed: f64, max_accel: f64) -> Self {
        let distance = distance.max(0.0);
        let a = max_accel;
        let v0 = snap_to_rest(entry.clamp(0.0, max_speed));
        let reach = 2.0 * a * distance;
        let v1 = snap_to_rest(
            exit.clamp(0.0, max_speed)
                .min((v0 * v0 + reach).sqrt())
                .max((v0 * v0 - reach).max(0.0).sqrt()),
        );

        let peak_unbounded = ((reach + v0 * v0 + v1 * v1) * 0.5).sqrt();
        let peak = peak_unbounded.min(max_speed).max(v0).max(v1);

        let accel_distance = (peak * peak - v0 * v0) / (2.0 * a);
        let decel_distance = (peak * peak - v1 * v1) / (2.0 * a);
        let cruise_distance = (distance - accel_distance - decel_distance).max(0.0);

        let cruise_time_s = if peak > EPSILON_FT_S {
            cruise_distance / peak
        } else {
            0.0
        };

        Self {
            distance,
            entry_velocity: v0,
            peak_velocity: peak,
            exit_velocity: v1,
            acceleration: a,
            accel_time_s: (peak - v0) / a,
            cruise_time_s,
            decel_time_s: (peak - v1) / a,
            accel_distance,
            cruise_distance,
        }
    }

    /// Total time to traverse the segment.
    pub fn duration(&self) -> f64 {
        self.accel_time_s + self.cruise_time_s + self.decel_time_s
    }

    /// True when the segment never holds the peak speed.
    pub fn is_triangular(&self) -> bool {
        self.cruise_time_s <= 0.0
    }

    /// Distance covered `t` seconds into the segment.
    pub fn distance_at(&self, t: f64) -> f64 {
        let a = self.acceleration;
        if t >= self.duration() {
            return self.distance;
        }
        let t = t.max(0.0);
        let s = if t <= self.accel_time_s {
            self.entry_velocity * t + 0.5 * a * t * t
        } else if t <= self.accel_time_s + self.cruise_time_s {
            self.accel_distance + self.peak_velocity * (t - self.accel_time_s)
        } else {
            let tau = t - self.accel_time_s - self.cruise_time_s;
            self.accel_distance + self.cruise_distance + self.peak_velocity * tau
                - 0.5 * a * tau * tau
        };
        s.clamp(0.0, self.distance)
    }

    /// Speed `t` seconds into the segment.
    pub fn velocity_at(&self, t: f64) -> f64 {
        let a = self.acceleration;
        if t >= self.duration() {
            return self.exit_velocity;
        }
        let t = t.max(0.0);
        let v = if t <= self.accel_time_s {
            self.entry_velocity + a * t
        } else if t <= self.accel_time_s + self.cruise_time_s {
            self.peak_velocity
        } else {
            let tau = t - self.accel_time_s - self.cruise_time_s;
            self.peak_velocity - a * tau
        };
        v.clamp(0.0, self.peak_velocity)
    }
}

/// Speeds within rounding noise of zero are a stop.
pub(crate) fn snap_to_rest(v: f64) -> f64 {
    if v < EPSILON_FT_S { 0.0 } else { v }
}
