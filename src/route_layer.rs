use itertools::Itertools;

use crate::map_data::MapRoute;
use crate::map_surface::MapSurface;
use crate::renderer::{ArrowDecoration, Pane, PathStyle, VisualHandle};
use crate::route_path::RoutePath;
use crate::viewport::{GeoBounds, ScreenPoint, Viewport};

// Arrow decoration pattern along the drawn line, in screen pixels.
const ARROW_OFFSET_PX: f64 = 12.0;
const ARROW_REPEAT_PX: f64 = 80.0;
const ARROW_SIZE_PX: f64 = 8.0;

/// The drawn route: path visual, cumulative-distance table and bounds. The
/// path data is owned here and read-shared with the vehicle tracker and the
/// label pass.
pub struct RouteLayer {
    path: RoutePath,
    bounds: GeoBounds,
    path_handle: Box<dyn VisualHandle>,
    decoration_handle: Option<Box<dyn VisualHandle>>,
}

impl RouteLayer {
    /// Draws the route and builds its distance table. Returns `None` when the
    /// geometry has fewer than two valid points or the surface is inert; the
    /// map then simply has no route.
    pub fn build(surface: &mut MapSurface, route: &MapRoute) -> Option<RouteLayer> {
        let path = RoutePath::from_line_string(&route.geometry)?;
        let bounds = GeoBounds::from_points(path.points())?;

        let style = PathStyle {
            color: route.stroke_color().to_string(),
            weight: 2.0,
        };
        let renderer = surface.renderer_mut()?;
        let path_handle = match renderer.add_path(path.points(), &style, Pane::Route) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("failed to draw route: {e}");
                return None;
            }
        };

        // arrows are cosmetic; losing them must not affect the route
        let arrows = arrow_decorations(&path, renderer.viewport(), route.stroke_color());
        let decoration_handle = match renderer.add_decorations(&arrows) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("skipping route arrow decorations: {e}");
                None
            }
        };

        Some(RouteLayer {
            path,
            bounds,
            path_handle,
            decoration_handle,
        })
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Route vertices in container pixels for the current viewport.
    pub fn projected_points(&self, viewport: &Viewport) -> Vec<ScreenPoint> {
        self.path.points().iter().map(|p| viewport.project(p)).collect()
    }

    pub fn clear(&mut self) {
        self.path_handle.remove();
        if let Some(handle) = &mut self.decoration_handle {
            handle.remove();
        }
    }
}

/// Arrowheads sampled at a fixed pixel interval along the projected polyline,
/// each oriented to its segment.
fn arrow_decorations(path: &RoutePath, viewport: &Viewport, color: &str) -> Vec<ArrowDecoration> {
    let mut arrows = Vec::new();
    let mut walked = 0.0;
    let mut next_at = ARROW_OFFSET_PX;

    for ((a, b), (pa, pb)) in path
        .points()
        .iter()
        .tuple_windows()
        .zip(path.points().iter().map(|p| viewport.project(p)).tuple_windows())
    {
        let seg_px = ((pb.x - pa.x).powi(2) + (pb.y - pa.y).powi(2)).sqrt();
        if seg_px <= 0.0 {
            continue;
        }
        let bearing = crate::geo_utils::bearing(a, b);
        while next_at <= walked + seg_px {
            let local = (next_at - walked) / seg_px;
            arrows.push(ArrowDecoration {
                position: crate::map_data::GeoPoint {
                    lat: a.lat * (1.0 - local) + b.lat * local,
                    lng: a.lng * (1.0 - local) + b.lng * local,
                },
                bearing,
                size_px: ARROW_SIZE_PX,
                color: color.to_string(),
            });
            next_at += ARROW_REPEAT_PX;
        }
        walked += seg_px;
    }
    arrows
}
