use geo_types::LineString;
use itertools::Itertools;

use crate::geo_utils;
use crate::map_data::GeoPoint;

/// An ordered route with its cumulative-distance table. Immutable once built;
/// a new route version gets a new `RoutePath`.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePath {
    points: Vec<GeoPoint>,
    /// cum[0] = 0, cum[i] = cum[i-1] + distance(points[i-1], points[i]).
    cumulative: Vec<f64>,
}

/// One interpolated position on the path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathPosition {
    pub point: GeoPoint,
    /// Forward azimuth of the segment the position lies on, degrees [0, 360).
    pub bearing: f64,
}

impl RoutePath {
    /// Builds a path from a geo linestring in lng/lat coordinate order.
    /// Invalid coordinates are dropped. Returns `None` when fewer than two
    /// usable points remain, because such a path has no length to travel.
    pub fn from_line_string(line: &LineString<f64>) -> Option<Self> {
        let points: Vec<GeoPoint> = line
            .coords()
            .filter_map(|c| GeoPoint::new(c.y, c.x))
            .collect();
        Self::from_points(points)
    }

    pub fn from_points(points: Vec<GeoPoint>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut cumulative = Vec::with_capacity(points.len());
        cumulative.push(0.0);
        for (a, b) in points.iter().tuple_windows() {
            let last = *cumulative.last().unwrap();
            cumulative.push(last + geo_utils::distance(a, b));
        }
        Some(RoutePath { points, cumulative })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total route length in meters.
    pub fn total_length(&self) -> f64 {
        *self.cumulative.last().unwrap()
    }

    /// Index of the vertex nearest to `target` by great-circle distance.
    pub fn nearest_vertex(&self, target: &GeoPoint) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (i, p) in self.points.iter().enumerate() {
            let d = geo_utils::distance(p, target);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }
        best_idx
    }

    /// Normalized [0, 1] progress of a vertex along the path.
    pub fn progress_at_vertex(&self, idx: usize) -> f64 {
        let total = self.total_length();
        if total <= 0.0 {
            return 0.0;
        }
        (self.cumulative[idx.min(self.cumulative.len() - 1)] / total).clamp(0.0, 1.0)
    }

    /// Position at normalized progress: locate the segment whose cumulative
    /// range brackets `progress * total` and interpolate linearly within it.
    pub fn position_at_progress(&self, progress: f64) -> PathPosition {
        let total = self.total_length();
        let target = progress.clamp(0.0, 1.0) * if total > 0.0 { total } else { 1.0 };

        let mut seg = 0;
        while seg < self.cumulative.len() - 1 && self.cumulative[seg + 1] < target {
            seg += 1;
        }
        let s0 = self.cumulative[seg];
        let s1 = if seg + 1 < self.cumulative.len() {
            self.cumulative[seg + 1]
        } else {
            s0
        };
        let local = if s1 == s0 { 0.0 } else { (target - s0) / (s1 - s0) };

        let a = self.points[seg];
        let b = self.points[(seg + 1).min(self.points.len() - 1)];
        // at the very end there is no forward segment, use the last one
        let (dir_a, dir_b) = if seg == self.points.len() - 1 {
            (self.points[self.points.len() - 2], self.points[self.points.len() - 1])
        } else {
            (a, b)
        };

        // segments are short enough that linear lat/lng interpolation holds
        let point = GeoPoint {
            lat: a.lat * (1.0 - local) + b.lat * local,
            lng: a.lng * (1.0 - local) + b.lng * local,
        };
        PathPosition {
            point,
            bearing: geo_utils::bearing(&dir_a, &dir_b),
        }
    }
}
