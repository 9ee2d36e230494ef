use crate::label_placer;
use crate::map_data::{FitMode, FitPadding, MapData};
use crate::map_surface::MapSurface;
use crate::marker_layer::MarkerLayer;
use crate::renderer::{MarkerStyle, Pane, VisualHandle};
use crate::route_layer::RouteLayer;
use crate::schedule::Schedule;
use crate::vehicle_tracker::VehicleTracker;
use crate::viewport::GeoBounds;
use crate::viewport_fitter::{self, CameraUpdate};

/// Overview mode places at most this many fixed labels.
const OVERVIEW_MAX_LABELS: usize = 2;

/// The data-change orchestrator. Two independent triggers drive it: the
/// synchronous data-change pass (`set_data` / `set_active_day`) that owns
/// route, marker and label state, and the per-frame callback (`on_frame`)
/// that owns only the vehicle. They never touch the same state.
pub struct ItineraryMap {
    surface: MapSurface,
    schedule: Schedule,
    route_layer: Option<RouteLayer>,
    marker_layer: Option<MarkerLayer>,
    label_handles: Vec<Box<dyn VisualHandle>>,
    vehicle: VehicleTracker,
    vehicle_handle: Option<Box<dyn VisualHandle>>,
    vehicle_color: String,
    active_day: Option<i32>,
    padding: FitPadding,
    show_labels: bool,
    fixed_label_names: Vec<String>,
    last_data_hash: Option<String>,
    did_initial_fit: bool,
    rebuild_count: u64,
}

impl ItineraryMap {
    pub fn new(surface: MapSurface, schedule: Schedule) -> Self {
        ItineraryMap {
            surface,
            schedule,
            route_layer: None,
            marker_layer: None,
            label_handles: Vec::new(),
            vehicle: VehicleTracker::new(),
            vehicle_handle: None,
            vehicle_color: "#0077cc".to_string(),
            active_day: None,
            padding: FitPadding::default(),
            show_labels: false,
            fixed_label_names: Vec::new(),
            last_data_hash: None,
            did_initial_fit: false,
            rebuild_count: 0,
        }
    }

    /// The data-change pass: rebuilds layers, fits the camera and re-places
    /// labels. Deduplicated by content hash: identical input skips the whole
    /// pass.
    pub fn set_data(&mut self, data: &MapData, now_ms: f64) {
        let hash = data.content_hash();
        if self.last_data_hash.as_deref() == Some(hash.as_str()) {
            return;
        }
        self.last_data_hash = Some(hash);
        self.rebuild_count += 1;

        self.active_day = data.active_day;
        self.padding = data.padding;
        self.show_labels = data.show_labels;
        self.fixed_label_names = data.fixed_label_names.clone();

        self.clear_labels();
        if let Some(layer) = &mut self.marker_layer {
            layer.clear();
        }
        self.marker_layer = None;
        if let Some(layer) = &mut self.route_layer {
            layer.clear();
        }
        self.route_layer = None;
        if let Some(handle) = &mut self.vehicle_handle {
            handle.remove();
        }
        self.vehicle_handle = None;

        if let Some(route) = &data.route {
            self.vehicle_color = route.stroke_color().to_string();
            self.route_layer = RouteLayer::build(&mut self.surface, route);
        }
        self.marker_layer = Some(MarkerLayer::build(&mut self.surface, &data.points));

        self.fit_for_mode(data.fit);

        if let Some(day) = self.active_day {
            self.apply_active_day(day);
        } else if self.show_labels {
            self.place_overview_labels();
        }

        self.retarget_vehicle(now_ms);
    }

    /// Lighter path for a day change: highlight/recenter/relabel without
    /// redrawing the layers.
    pub fn set_active_day(&mut self, day: Option<i32>, now_ms: f64) {
        self.active_day = day;
        match day {
            Some(day) => self.apply_active_day(day),
            None if self.show_labels => self.place_overview_labels(),
            None => self.clear_labels(),
        }
        self.retarget_vehicle(now_ms);
    }

    /// The per-frame callback. Returns whether another frame is wanted.
    pub fn on_frame(&mut self, now_ms: f64) -> bool {
        let Some(path) = self.route_layer.as_ref().map(|r| r.path()) else {
            return false;
        };
        let Some(frame) = self.vehicle.tick(path, now_ms) else {
            return false;
        };

        if self.vehicle_handle.is_none() {
            if let Some(renderer) = self.surface.renderer_mut() {
                // style is a hint; backends typically swap in a richer visual
                let mut style = MarkerStyle::base(&self.vehicle_color);
                style.radius = 8.0;
                match renderer.add_marker(frame.position, &style, Pane::Vehicle) {
                    Ok(handle) => self.vehicle_handle = Some(handle),
                    Err(e) => warn!("failed to create vehicle visual: {e}"),
                }
            }
        }
        if let Some(handle) = &mut self.vehicle_handle {
            handle.set_position(frame.position);
            handle.set_rotation(frame.rotation);
        }
        !frame.done
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    pub fn vehicle_progress(&self) -> f64 {
        self.vehicle.progress()
    }

    pub fn is_vehicle_animating(&self) -> bool {
        self.vehicle.is_animating()
    }

    pub fn label_count(&self) -> usize {
        self.label_handles.len()
    }

    pub fn marker_count(&self) -> usize {
        self.marker_layer.as_ref().map_or(0, |m| m.len())
    }

    pub fn viewport(&self) -> Option<&crate::viewport::Viewport> {
        self.surface.viewport()
    }

    fn combined_bounds(&self) -> Option<GeoBounds> {
        let route_bounds = self.route_layer.as_ref().map(|r| *r.bounds());
        let marker_bounds = self.marker_layer.as_ref().and_then(|m| {
            GeoBounds::from_points(m.entries().iter().map(|e| &e.position))
        });
        match (route_bounds, marker_bounds) {
            (Some(r), Some(m)) => Some(r.union(&m)),
            (Some(r), None) => Some(r),
            (None, Some(m)) => Some(m),
            (None, None) => None,
        }
    }

    fn fit_for_mode(&mut self, fit: FitMode) {
        let update = match fit {
            FitMode::None => None,
            FitMode::Auto => {
                if self.did_initial_fit {
                    None
                } else {
                    let bounds = self.combined_bounds();
                    let viewport = self.surface.viewport();
                    match (bounds, viewport) {
                        (Some(bounds), Some(viewport)) => {
                            viewport_fitter::initial_fit(Some(&bounds), viewport, &self.padding)
                        }
                        _ => None,
                    }
                }
            }
            FitMode::Route => self.bounds_to_view(self.route_layer.as_ref().map(|r| *r.bounds())),
            FitMode::Points => self.bounds_to_view(
                self.marker_layer
                    .as_ref()
                    .and_then(|m| GeoBounds::from_points(m.entries().iter().map(|e| &e.position))),
            ),
        };
        if let Some(update) = update {
            self.surface.apply(&update);
            if fit == FitMode::Auto {
                self.did_initial_fit = true;
            }
        }
    }

    fn bounds_to_view(&self, bounds: Option<GeoBounds>) -> Option<CameraUpdate> {
        let bounds = bounds.filter(|b| b.is_valid())?;
        let viewport = self.surface.viewport()?;
        let zoom = viewport.bounds_zoom(
            &bounds,
            self.padding.left + self.padding.right,
            30.0 + self.padding.bottom,
        )?;
        Some(CameraUpdate::SetView {
            center: bounds.center(),
            zoom: zoom.clamp(viewport.min_zoom, viewport.max_zoom),
            animate: true,
        })
    }

    fn apply_active_day(&mut self, day: i32) {
        let Some(markers) = self.marker_layer.as_mut() else {
            return;
        };
        let indices = markers.select_for_day(day);
        markers.emphasize(&mut self.surface, &indices);

        let positions = self
            .marker_layer
            .as_ref()
            .map(|m| m.positions(&indices))
            .unwrap_or_default();
        let route_bounds = self.route_layer.as_ref().map(|r| *r.bounds());
        let update = self.surface.viewport().and_then(|viewport| {
            viewport_fitter::active_day_fit(
                &positions,
                route_bounds.as_ref(),
                viewport,
                &self.padding,
            )
        });
        if let Some(update) = update {
            self.surface.apply(&update);
        }

        self.place_labels_for(&indices, None);
    }

    fn place_overview_labels(&mut self) {
        let indices = self
            .marker_layer
            .as_ref()
            .map(|m| m.select_by_name(&self.fixed_label_names))
            .unwrap_or_default();
        self.place_labels_for(&indices, Some(OVERVIEW_MAX_LABELS));
    }

    /// One full label pass: the previous labels fade out and are removed, the
    /// new set is placed from scratch against the current viewport.
    fn place_labels_for(&mut self, indices: &[usize], max_labels: Option<usize>) {
        self.clear_labels();

        let Some(markers) = self.marker_layer.as_ref() else {
            return;
        };
        let Some(viewport) = self.surface.viewport().cloned() else {
            return;
        };
        let requests = markers.label_requests(indices);
        if requests.is_empty() {
            return;
        }
        let route_rects = self
            .route_layer
            .as_ref()
            .map(|r| label_placer::sample_route_rects(&r.projected_points(&viewport)))
            .unwrap_or_default();
        let cap = max_labels.unwrap_or_else(|| label_placer::max_labels_for_zoom(viewport.zoom));
        let placements = label_placer::place_labels(&requests, &route_rects, &viewport, cap);

        let Some(renderer) = self.surface.renderer_mut() else {
            return;
        };
        for placement in placements {
            let width = placement.rect.right - placement.rect.left;
            let height = placement.rect.bottom - placement.rect.top;
            match renderer.add_label(placement.anchor, &placement.text, width, height) {
                Ok(handle) => self.label_handles.push(handle),
                Err(e) => warn!("failed to draw label '{}': {e}", placement.text),
            }
        }
    }

    fn clear_labels(&mut self) {
        for handle in &mut self.label_handles {
            handle.remove();
        }
        self.label_handles.clear();
    }

    fn retarget_vehicle(&mut self, now_ms: f64) {
        let Some(path) = self.route_layer.as_ref().map(|r| r.path()) else {
            return;
        };
        let day = self.active_day.unwrap_or(1);
        if let Some(target) = VehicleTracker::target_progress_for_day(path, &self.schedule, day) {
            self.vehicle.set_target(target, now_ms);
        }
    }
}
