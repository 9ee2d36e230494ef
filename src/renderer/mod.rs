pub mod loader;
pub use loader::RendererFactory;

use anyhow::Result;
use strum_macros::EnumIter;

use crate::map_data::GeoPoint;
use crate::viewport::{ScreenPoint, Viewport};

/// Rendering panes in their stacking order: route beneath markers beneath
/// vehicle beneath labels. The fixed z-indices make visual stacking
/// deterministic regardless of draw order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Pane {
    Route,
    Marker,
    Vehicle,
    Label,
}

impl Pane {
    pub fn z_index(&self) -> u32 {
        match self {
            Pane::Route => 600,
            Pane::Marker => 650,
            Pane::Vehicle => 700,
            Pane::Label => 750,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceOptions {
    pub width: f64,
    pub height: f64,
    pub center: GeoPoint,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl SurfaceOptions {
    pub fn new(width: f64, height: f64, center: GeoPoint, zoom: f64) -> Self {
        SurfaceOptions {
            width,
            height,
            center,
            zoom,
            min_zoom: 4.0,
            max_zoom: 13.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke_color: String,
    pub stroke_weight: f64,
    pub opacity: f64,
    pub tooltip: Option<String>,
}

impl MarkerStyle {
    pub fn base(fill_color: &str) -> Self {
        MarkerStyle {
            radius: 6.0,
            fill_color: fill_color.to_string(),
            fill_opacity: 0.95,
            stroke_color: "#fff".to_string(),
            stroke_weight: 0.6,
            opacity: 1.0,
            tooltip: None,
        }
    }

    /// Emphasis for the day-focused subset.
    pub fn emphasized(fill_color: &str) -> Self {
        MarkerStyle {
            radius: 7.0,
            ..Self::base(fill_color)
        }
    }
}

/// One directional arrowhead along the drawn route.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowDecoration {
    pub position: GeoPoint,
    pub bearing: f64,
    pub size_px: f64,
    pub color: String,
}

/// A visual owned by the renderer. Layers hold these to move or drop visuals
/// without knowing anything about the backend; backends are free to animate
/// removal (labels fade out).
pub trait VisualHandle {
    fn set_position(&mut self, position: GeoPoint);
    fn set_rotation(&mut self, degrees: f64);
    fn remove(&mut self);
}

/// The rendering capability this crate draws through. One implementation per
/// backend; a fake implementation is enough to exercise every layer in tests.
pub trait MapRenderer {
    fn viewport(&self) -> &Viewport;
    fn set_view(&mut self, center: GeoPoint, zoom: f64, animate: bool);
    fn pan_to(&mut self, center: GeoPoint, animate: bool);

    fn project(&self, point: &GeoPoint) -> ScreenPoint {
        self.viewport().project(point)
    }

    fn unproject(&self, point: &ScreenPoint) -> GeoPoint {
        self.viewport().unproject(point)
    }

    fn add_path(
        &mut self,
        points: &[GeoPoint],
        style: &PathStyle,
        pane: Pane,
    ) -> Result<Box<dyn VisualHandle>>;

    fn add_marker(
        &mut self,
        position: GeoPoint,
        style: &MarkerStyle,
        pane: Pane,
    ) -> Result<Box<dyn VisualHandle>>;

    fn add_label(
        &mut self,
        position: GeoPoint,
        text: &str,
        width: f64,
        height: f64,
    ) -> Result<Box<dyn VisualHandle>>;

    /// Cosmetic arrow overlay. Callers treat failure as non-fatal.
    fn add_decorations(&mut self, arrows: &[ArrowDecoration]) -> Result<Box<dyn VisualHandle>>;
}
