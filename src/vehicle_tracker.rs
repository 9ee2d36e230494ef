use crate::map_data::GeoPoint;
use crate::route_path::RoutePath;
use crate::schedule::Schedule;

/// Progress deltas below this are snapped without animation.
const SNAP_EPSILON: f64 = 0.001;
const DURATION_BASE_MS: f64 = 600.0;
const DURATION_PER_PROGRESS_MS: f64 = 2000.0;
const DURATION_MAX_MS: f64 = 1200.0;

/// Per-frame smoothing factor for the rotation approach.
const ROTATION_SMOOTHING: f64 = 0.25;

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - f64::powi(-2.0 * t + 2.0, 3) / 2.0
    }
}

/// What the vehicle visual needs for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VehicleFrame {
    pub position: GeoPoint,
    /// Compass bearing of the current path segment. Computed every frame but
    /// not applied as rotation, see `rotation`.
    pub bearing: f64,
    /// Smoothed visual rotation in degrees. The rotation target is fixed at
    /// neutral.
    pub rotation: f64,
    pub done: bool,
}

/// Eased motion of a single marker along the route. Two states: idle and
/// animating. A new target arriving mid-animation retargets from the current
/// interpolated progress, so the motion stays continuous.
#[derive(Clone, Debug)]
pub struct VehicleTracker {
    progress: f64,
    from_progress: f64,
    target_progress: f64,
    anim_start_ms: f64,
    duration_ms: f64,
    animating: bool,
    rotation: f64,
}

impl VehicleTracker {
    pub fn new() -> Self {
        VehicleTracker {
            progress: 0.0,
            from_progress: 0.0,
            target_progress: 0.0,
            anim_start_ms: 0.0,
            duration_ms: 0.0,
            animating: false,
            rotation: 0.0,
        }
    }

    /// Progress of the schedule target for a day: resolve the waypoint, find
    /// the nearest route vertex, read its cumulative share. `None` when the
    /// schedule is empty or the waypoint has no coordinate.
    pub fn target_progress_for_day(
        route: &RoutePath,
        schedule: &Schedule,
        day: i32,
    ) -> Option<f64> {
        let target = schedule.target_for_day(day)?;
        let idx = route.nearest_vertex(&target);
        Some(route.progress_at_vertex(idx))
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Starts (or retargets) motion toward `target`. Duration scales with the
    /// progress delta; a near-zero delta snaps with duration 0. While a
    /// previous animation is in flight the new one departs from the current
    /// interpolated progress, never from the stale start point.
    pub fn set_target(&mut self, target: f64, now_ms: f64) {
        let target = target.clamp(0.0, 1.0);
        let from = if self.animating {
            self.eased_progress_at(now_ms).0
        } else {
            self.progress
        };
        let diff = (target - from).abs();
        self.from_progress = from;
        self.target_progress = target;
        self.anim_start_ms = now_ms;
        self.duration_ms = if diff < SNAP_EPSILON {
            0.0
        } else {
            DURATION_MAX_MS.min(DURATION_BASE_MS + diff * DURATION_PER_PROGRESS_MS)
        };
        self.animating = true;
    }

    fn eased_progress_at(&self, now_ms: f64) -> (f64, bool) {
        let elapsed = (now_ms - self.anim_start_ms).max(0.0);
        if self.duration_ms <= 0.0 || elapsed >= self.duration_ms {
            // snap exactly to the target to avoid floating-point drift
            return (self.target_progress, true);
        }
        let t = elapsed / self.duration_ms;
        let eased = ease_in_out_cubic(t);
        (
            self.from_progress + (self.target_progress - self.from_progress) * eased,
            false,
        )
    }

    /// Advances the animation to `now_ms`. Returns `None` while idle; the
    /// vehicle visual does not need touching then.
    pub fn tick(&mut self, route: &RoutePath, now_ms: f64) -> Option<VehicleFrame> {
        if !self.animating {
            return None;
        }
        let (progress, done) = self.eased_progress_at(now_ms);
        self.progress = progress;
        if done {
            self.animating = false;
        }

        let pos = route.position_at_progress(progress);

        // rotation target is fixed at neutral; keep the shortest-path
        // smoothing so the approach stays continuous if a target is ever set
        let rotation_target = 0.0;
        let diff = ((rotation_target - self.rotation + 540.0) % 360.0) - 180.0;
        self.rotation += diff * ROTATION_SMOOTHING;

        Some(VehicleFrame {
            position: pos.point,
            bearing: pos.bearing,
            rotation: self.rotation,
            done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_f64_near!(ease_in_out_cubic(0.0), 0.0);
        assert_f64_near!(ease_in_out_cubic(0.5), 0.5);
        assert_f64_near!(ease_in_out_cubic(1.0), 1.0);
        // slow start
        assert!(ease_in_out_cubic(0.1) < 0.1);
        // fast middle
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }

    #[test]
    fn duration_scales_and_caps() {
        let mut tracker = VehicleTracker::new();
        tracker.set_target(0.1, 0.0);
        assert_f64_near!(tracker.duration_ms, 600.0 + 0.1 * 2000.0);

        let mut tracker = VehicleTracker::new();
        tracker.set_target(1.0, 0.0);
        assert_f64_near!(tracker.duration_ms, 1200.0);

        let mut tracker = VehicleTracker::new();
        tracker.set_target(0.0005, 0.0);
        assert_f64_near!(tracker.duration_ms, 0.0);
    }
}
