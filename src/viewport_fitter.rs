use crate::map_data::{FitPadding, GeoPoint};
use crate::viewport::{GeoBounds, Viewport};

/// Fit paddings reserve a fixed 30px strip at the top; left/right/bottom come
/// from the host.
const PAD_TOP: f64 = 30.0;

/// How small a zoom change gets absorbed by a pan instead of a zoom, to avoid
/// visual jitter on day-to-day steps.
const PAN_ONLY_ZOOM_DELTA: f64 = 0.6;

/// A camera placement decision. The surface applies it; the fitter never
/// mutates the viewport itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CameraUpdate {
    SetView {
        center: GeoPoint,
        zoom: f64,
        animate: bool,
    },
    Pan {
        center: GeoPoint,
    },
}

/// First-run fit: present the combined route+marker bounds one zoom level
/// wider than the tight fit, without animation, so the first paint favors
/// orientation over detail.
pub fn initial_fit(
    bounds: Option<&GeoBounds>,
    viewport: &Viewport,
    padding: &FitPadding,
) -> Option<CameraUpdate> {
    let bounds = bounds.filter(|b| b.is_valid())?;
    let tight = viewport.bounds_zoom(
        bounds,
        padding.left + padding.right,
        PAD_TOP + padding.bottom,
    )?;
    let distant = (tight - 1.0).clamp(viewport.min_zoom, viewport.max_zoom);
    Some(CameraUpdate::SetView {
        center: bounds.center(),
        zoom: distant,
        animate: false,
    })
}

/// Active-day fit: bounds of the day-relevant markers unioned with the full
/// route bounds. Small zoom deltas pan only; larger ones animate center and
/// zoom together. Degenerate bounds skip the fit silently.
pub fn active_day_fit(
    visible_markers: &[GeoPoint],
    route_bounds: Option<&GeoBounds>,
    viewport: &Viewport,
    padding: &FitPadding,
) -> Option<CameraUpdate> {
    let marker_bounds = GeoBounds::from_points(visible_markers.iter());
    let combined = match (route_bounds, marker_bounds) {
        (Some(r), Some(m)) => r.union(&m),
        (Some(r), None) => *r,
        (None, Some(m)) => m,
        (None, None) => return None,
    };
    if !combined.is_valid() {
        return None;
    }

    let tight = viewport.bounds_zoom(
        &combined,
        padding.left + padding.right,
        PAD_TOP + padding.bottom,
    )?;
    let target_zoom = tight.clamp(viewport.min_zoom, viewport.max_zoom);
    let center = combined.center();

    if (target_zoom - viewport.zoom).abs() <= PAN_ONLY_ZOOM_DELTA {
        Some(CameraUpdate::Pan { center })
    } else {
        Some(CameraUpdate::SetView {
            center,
            zoom: target_zoom,
            animate: true,
        })
    }
}
