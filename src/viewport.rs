use serde::{Deserialize, Serialize};

use crate::geo_utils;
use crate::map_data::GeoPoint;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ScreenPoint { x, y }
    }
}

/// Axis-aligned rectangle in container pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ScreenRect {
    pub fn centered_at(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        ScreenRect {
            left: cx - width / 2.0,
            top: cy - height / 2.0,
            right: cx + width / 2.0,
            bottom: cy + height / 2.0,
        }
    }

    pub fn overlap_area(&self, other: &ScreenRect) -> f64 {
        let left = self.left.max(other.left);
        let right = self.right.min(other.right);
        let top = self.top.max(other.top);
        let bottom = self.bottom.min(other.bottom);
        if right <= left || bottom <= top {
            return 0.0;
        }
        (right - left) * (bottom - top)
    }

    pub fn overlaps(&self, other: &ScreenRect) -> bool {
        self.overlap_area(other) > 0.0
    }
}

/// Geographic bounding box. Only ever built from validated points, so both
/// corners are valid by construction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        let mut bounds: Option<GeoBounds> = None;
        for p in points {
            match &mut bounds {
                None => {
                    bounds = Some(GeoBounds {
                        south: p.lat,
                        west: p.lng,
                        north: p.lat,
                        east: p.lng,
                    })
                }
                Some(b) => b.extend(p),
            }
        }
        bounds
    }

    pub fn extend(&mut self, p: &GeoPoint) {
        self.south = self.south.min(p.lat);
        self.west = self.west.min(p.lng);
        self.north = self.north.max(p.lat);
        self.east = self.east.max(p.lng);
    }

    pub fn union(mut self, other: &GeoBounds) -> GeoBounds {
        self.south = self.south.min(other.south);
        self.west = self.west.min(other.west);
        self.north = self.north.max(other.north);
        self.east = self.east.max(other.east);
        self
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.south + self.north) / 2.0,
            lng: (self.west + self.east) / 2.0,
        }
    }

    /// Both corners valid and the box non-degenerate (a single point still
    /// counts, a zero-size box from no data does not arise by construction).
    pub fn is_valid(&self) -> bool {
        geo_utils::is_valid_point(self.south, self.west)
            && geo_utils::is_valid_point(self.north, self.east)
            && self.north >= self.south
            && self.east >= self.west
    }
}

/// The camera: center, zoom, pixel size and zoom limits. Projection between
/// geographic and container-pixel coordinates lives here so that layers and
/// the label pass stay renderer-agnostic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: f64, width: f64, height: f64) -> Self {
        Viewport {
            center,
            zoom,
            width,
            height,
            min_zoom: 4.0,
            max_zoom: 13.0,
        }
    }

    pub fn set_view(&mut self, center: GeoPoint, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Geographic point to container pixels, origin at the top-left corner.
    pub fn project(&self, p: &GeoPoint) -> ScreenPoint {
        let (wx, wy) = geo_utils::lng_lat_to_world_pixel(p.lng, p.lat, self.zoom);
        let (cx, cy) = geo_utils::lng_lat_to_world_pixel(self.center.lng, self.center.lat, self.zoom);
        ScreenPoint::new(wx - cx + self.width / 2.0, wy - cy + self.height / 2.0)
    }

    pub fn unproject(&self, p: &ScreenPoint) -> GeoPoint {
        let (cx, cy) = geo_utils::lng_lat_to_world_pixel(self.center.lng, self.center.lat, self.zoom);
        let (lng, lat) =
            geo_utils::world_pixel_to_lng_lat(cx + p.x - self.width / 2.0, cy + p.y - self.height / 2.0, self.zoom);
        GeoPoint { lat, lng }
    }

    /// Largest whole zoom level at which `bounds` fits inside the viewport
    /// with the given padding. `None` when the bounds or viewport are unusable.
    pub fn bounds_zoom(&self, bounds: &GeoBounds, pad_x: f64, pad_y: f64) -> Option<f64> {
        if !bounds.is_valid() {
            return None;
        }
        let avail_w = self.width - pad_x;
        let avail_h = self.height - pad_y;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return None;
        }
        let (x0, y0) = geo_utils::lng_lat_to_world_pixel(bounds.west, bounds.north, 0.0);
        let (x1, y1) = geo_utils::lng_lat_to_world_pixel(bounds.east, bounds.south, 0.0);
        let dx = x1 - x0;
        let dy = y1 - y0;
        if dx <= 0.0 && dy <= 0.0 {
            // single point, any zoom fits
            return Some(self.max_zoom);
        }
        let scale = (avail_w / dx.max(1e-9)).min(avail_h / dy.max(1e-9));
        Some(scale.log2().floor())
    }
}
