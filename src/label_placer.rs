use crate::map_data::GeoPoint;
use crate::viewport::{ScreenPoint, ScreenRect, Viewport};

const RING_RADIUS_MIN: f64 = 18.0;
const RING_RADIUS_MAX: f64 = 220.0;
const RING_RADIUS_STEP: f64 = 14.0;
const RING_ARC_SPACING: f64 = 22.0;

const LABEL_HEIGHT: f64 = 18.0;
const LABEL_MAX_WIDTH: f64 = 260.0;
const VIEWPORT_MARGIN: f64 = 6.0;

const ROUTE_SAMPLE_STRIDE: usize = 12;
const ROUTE_RECT_HALF: f64 = 6.0;

lazy_static! {
    /// Candidate offsets around an anchor, innermost ring first. Per ring of
    /// radius r the candidates are spaced so the arc length between them is
    /// about `RING_ARC_SPACING` px, with a floor of 8 per ring. Deterministic,
    /// so the search result only depends on its inputs.
    static ref RING_OFFSETS: Vec<(f64, f64)> = {
        let mut offsets = Vec::new();
        let mut r = RING_RADIUS_MIN;
        while r <= RING_RADIUS_MAX {
            let circumference = 2.0 * std::f64::consts::PI * r;
            let steps = ((circumference / RING_ARC_SPACING).floor() as usize).max(8);
            for i in 0..steps {
                let angle = (i as f64 / steps as f64) * std::f64::consts::TAU;
                offsets.push(((angle.cos() * r).round(), (angle.sin() * r).round()));
            }
            r += RING_RADIUS_STEP;
        }
        offsets
    };
}

/// A marker that wants a text label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRequest {
    /// Index into the marker layer, carried through to the placement.
    pub marker_index: usize,
    pub text: String,
    pub anchor: GeoPoint,
}

/// One placed label. Rebuilt wholesale on every pass; never patched in place.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPlacement {
    pub marker_index: usize,
    pub text: String,
    pub rect: ScreenRect,
    /// Geographic anchor of the label center, so the visual stays put when
    /// the camera moves between passes.
    pub anchor: GeoPoint,
}

pub fn label_width(text: &str) -> f64 {
    LABEL_MAX_WIDTH.min(8.0 + text.chars().count() as f64 * 7.0)
}

/// How many labels fit a zoom level before the view turns into clutter.
pub fn max_labels_for_zoom(zoom: f64) -> usize {
    if zoom < 8.0 {
        3
    } else if zoom < 11.0 {
        6
    } else {
        99
    }
}

/// Samples the projected route polyline into small axis-aligned rectangles
/// that labels must avoid. Walks every `ROUTE_SAMPLE_STRIDE`-th vertex; the
/// avoid set is independent of label order.
pub fn sample_route_rects(route_screen_points: &[ScreenPoint]) -> Vec<ScreenRect> {
    route_screen_points
        .iter()
        .step_by(ROUTE_SAMPLE_STRIDE)
        .map(|p| ScreenRect {
            left: p.x - ROUTE_RECT_HALF,
            top: p.y - ROUTE_RECT_HALF,
            right: p.x + ROUTE_RECT_HALF,
            bottom: p.y + ROUTE_RECT_HALF,
        })
        .collect()
}

fn rect_fits(
    rect: &ScreenRect,
    viewport: &Viewport,
    placed: &[ScreenRect],
    route_rects: &[ScreenRect],
) -> bool {
    if rect.left < VIEWPORT_MARGIN || rect.top < VIEWPORT_MARGIN {
        return false;
    }
    if rect.right > viewport.width - VIEWPORT_MARGIN
        || rect.bottom > viewport.height - VIEWPORT_MARGIN
    {
        return false;
    }
    if placed.iter().any(|r| rect.overlaps(r)) {
        return false;
    }
    if route_rects.iter().any(|r| rect.overlaps(r)) {
        return false;
    }
    true
}

/// Greedy nearest-ring placement: for each request, in input order, take the
/// first candidate position that clears the viewport margin, every label
/// placed earlier in this pass, and the route-avoidance rectangles. A request
/// with no valid candidate is left unlabeled, which is expected steady-state
/// behavior under high marker density, not an error.
pub fn place_labels(
    requests: &[LabelRequest],
    route_rects: &[ScreenRect],
    viewport: &Viewport,
    max_labels: usize,
) -> Vec<LabelPlacement> {
    let mut placements: Vec<LabelPlacement> = Vec::new();
    let mut placed_rects: Vec<ScreenRect> = Vec::new();

    for request in requests {
        if placements.len() >= max_labels {
            break;
        }
        let anchor_px = viewport.project(&request.anchor);
        let width = label_width(&request.text);

        for (dx, dy) in RING_OFFSETS.iter() {
            let cx = anchor_px.x + dx;
            let cy = anchor_px.y + dy;
            let rect = ScreenRect::centered_at(cx, cy, width, LABEL_HEIGHT);
            if !rect_fits(&rect, viewport, &placed_rects, route_rects) {
                continue;
            }
            let anchor = viewport.unproject(&ScreenPoint::new(cx, cy));
            placed_rects.push(rect);
            placements.push(LabelPlacement {
                marker_index: request.marker_index,
                text: request.text.clone(),
                rect,
                anchor,
            });
            break;
        }
    }
    placements
}
