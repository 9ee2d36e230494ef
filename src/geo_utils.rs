use std::f64::consts::PI;

use crate::map_data::GeoPoint;

pub const EARTH_RADIUS: f64 = 6371000.0; // unit: meter

/// Great-circle distance between two points in meters (haversine).
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lng = (d_lng / 2.0).sin();
    let h = sin_d_lat * sin_d_lat + sin_d_lng * sin_d_lng * lat1.cos() * lat2.cos();
    2.0 * EARTH_RADIUS * h.sqrt().asin()
}

/// Forward azimuth from `a` to `b` in degrees, 0 = north, clockwise, [0, 360).
pub fn bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    let deg = y.atan2(x).to_degrees();
    (deg + 360.0) % 360.0
}

pub fn is_valid_point(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

// Web Mercator world pixels with 256px tiles, same projection as the slippy
// map tile scheme: https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames
pub fn lng_lat_to_world_pixel(lng: f64, lat: f64, zoom: f64) -> (f64, f64) {
    let world = 256.0 * f64::powf(2.0, zoom);
    let lat_rad = (lat / 180.0) * PI;
    let x = ((lng + 180.0) / 360.0) * world;
    let y = (1.0 - ((lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI)) / 2.0 * world;
    (x, y)
}

pub fn world_pixel_to_lng_lat(x: f64, y: f64, zoom: f64) -> (f64, f64) {
    let world = 256.0 * f64::powf(2.0, zoom);
    let lng = (x / world) * 360.0 - 180.0;
    let lat = (f64::atan(f64::sinh(PI * (1.0 - (2.0 * y) / world))) * 180.0) / PI;
    (lng, lat)
}
