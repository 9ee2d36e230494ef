use geo_types::LineString;
use hex::ToHex;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use strum_macros::EnumIter;

use crate::geo_utils;

/// A validated geographic point. Construction fails for out-of-range or
/// non-finite coordinates, so holding one implies validity.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if geo_utils::is_valid_point(lat, lng) {
            Some(GeoPoint { lat, lng })
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerCategory {
    Tour,
    Lived,
    Traveled,
}

impl MarkerCategory {
    pub fn fill_color(&self) -> &'static str {
        match self {
            MarkerCategory::Tour => "#0074d9",
            MarkerCategory::Lived => "#3b82f6",
            MarkerCategory::Traveled => "#10b981",
        }
    }
}

/// A marker as supplied by the host. Coordinates are kept raw so that invalid
/// entries can be carried to the point of use and filtered there instead of
/// rejecting the whole list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
    pub day: Option<i32>,
    pub category: Option<MarkerCategory>,
}

impl MapMarker {
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.lat, self.lng)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRoute {
    /// Route geometry as a geo linestring (lng/lat coordinate order).
    pub geometry: LineString<f64>,
    pub color: Option<String>,
}

impl MapRoute {
    pub fn stroke_color(&self) -> &str {
        self.color.as_deref().unwrap_or("#0077cc")
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    #[default]
    Auto,
    None,
    Route,
    Points,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitPadding {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for FitPadding {
    fn default() -> Self {
        FitPadding {
            left: 30.0,
            right: 0.0,
            bottom: 50.0,
        }
    }
}

/// Everything the host supplies for one render state of the map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub route: Option<MapRoute>,
    pub points: Vec<MapMarker>,
    pub active_day: Option<i32>,
    pub fit: FitMode,
    pub padding: FitPadding,
    pub show_labels: bool,
    /// Marker names that get labels in overview mode (no active day).
    pub fixed_label_names: Vec<String>,
}

#[derive(Serialize)]
struct HashPayload<'a> {
    points: Vec<(Option<i32>, &'a str, f64, f64)>,
    active_day: Option<i32>,
    color: Option<&'a str>,
    has_geometry: bool,
    show_labels: bool,
    fixed_label_names: &'a [String],
}

impl MapData {
    /// Content hash over everything that affects the data-change pass.
    /// Identical hashes mean the rebuild can be skipped entirely.
    pub fn content_hash(&self) -> String {
        let payload = HashPayload {
            points: self
                .points
                .iter()
                .map(|p| (p.day, p.name.as_deref().unwrap_or(""), p.lat, p.lng))
                .collect(),
            active_day: self.active_day,
            color: self.route.as_ref().and_then(|r| r.color.as_deref()),
            has_geometry: self.route.is_some(),
            show_labels: self.show_labels,
            fixed_label_names: &self.fixed_label_names,
        };
        let mut hasher = Sha1::new();
        // serializing a struct of plain fields cannot fail
        hasher.update(serde_json::to_string(&payload).unwrap());
        hasher.finalize().encode_hex::<String>()
    }
}
