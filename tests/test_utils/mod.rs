#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use geo_types::LineString;

use itinerary_map_core::map_data::{GeoPoint, MapData, MapMarker, MapRoute, MarkerCategory};
use itinerary_map_core::renderer::{
    ArrowDecoration, MapRenderer, MarkerStyle, Pane, PathStyle, VisualHandle,
};
use itinerary_map_core::schedule::{Schedule, ScheduleEntry};
use itinerary_map_core::viewport::Viewport;

// A Madrid -> Setubal style test route, roughly the shape the real data has.
pub const ROUTE_COORDS: [(f64, f64); 7] = [
    // (lng, lat)
    (-3.7038, 40.4168), // Madrid
    (-6.0908, 40.0296), // Plasencia
    (-6.3729, 39.4753), // Caceres
    (-6.3419, 38.9156), // Merida
    (-7.1639, 38.8939), // Elvas
    (-7.9135, 38.5716), // Evora
    (-8.8882, 38.5244), // Setubal
];

pub fn test_route() -> MapRoute {
    MapRoute {
        geometry: LineString::from(
            ROUTE_COORDS.iter().map(|&(x, y)| (x, y)).collect::<Vec<_>>(),
        ),
        color: None,
    }
}

pub fn marker(day: Option<i32>, name: &str, lat: f64, lng: f64) -> MapMarker {
    MapMarker {
        lat,
        lng,
        name: Some(name.to_string()),
        day,
        category: Some(MarkerCategory::Tour),
    }
}

pub fn test_markers() -> Vec<MapMarker> {
    vec![
        marker(Some(1), "Madrid", 40.4168, -3.7038),
        marker(Some(2), "Plasencia", 40.0296, -6.0908),
        marker(Some(4), "Caceres", 39.4753, -6.3729),
        marker(Some(6), "Merida", 38.9156, -6.3419),
        marker(Some(8), "Elvas", 38.8939, -7.1639),
        marker(Some(10), "Evora", 38.5716, -7.9135),
        marker(Some(12), "Setubal", 38.5244, -8.8882),
    ]
}

pub fn test_schedule() -> Schedule {
    let entries = vec![
        ScheduleEntry {
            day_from: 1,
            day_to: 1,
            waypoint_name: "Madrid".into(),
        },
        ScheduleEntry {
            day_from: 2,
            day_to: 3,
            waypoint_name: "Plasencia".into(),
        },
        ScheduleEntry {
            day_from: 4,
            day_to: 5,
            waypoint_name: "Caceres".into(),
        },
        ScheduleEntry {
            day_from: 6,
            day_to: 7,
            waypoint_name: "Merida".into(),
        },
        ScheduleEntry {
            day_from: 8,
            day_to: 9,
            waypoint_name: "Elvas".into(),
        },
        ScheduleEntry {
            day_from: 10,
            day_to: 11,
            waypoint_name: "Evora".into(),
        },
        ScheduleEntry {
            day_from: 12,
            day_to: 14,
            waypoint_name: "Setubal".into(),
        },
    ];
    let waypoints: HashMap<String, GeoPoint> = ROUTE_COORDS
        .iter()
        .zip([
            "Madrid", "Plasencia", "Caceres", "Merida", "Elvas", "Evora", "Setubal",
        ])
        .map(|(&(lng, lat), name)| (name.to_string(), GeoPoint::new(lat, lng).unwrap()))
        .collect();
    Schedule::new(entries, waypoints)
}

pub fn test_map_data() -> MapData {
    MapData {
        route: Some(test_route()),
        points: test_markers(),
        ..Default::default()
    }
}

/// Everything the fake renderer was asked to do, for assertions.
#[derive(Default)]
pub struct RenderLog {
    pub paths: Vec<(usize, PathStyle)>,
    pub markers: Vec<(GeoPoint, MarkerStyle)>,
    pub labels: Vec<(GeoPoint, String, f64, f64)>,
    pub decoration_batches: Vec<usize>,
    pub removed: usize,
    pub moves: Vec<(Pane, GeoPoint)>,
    pub rotations: Vec<(Pane, f64)>,
    pub set_views: Vec<(GeoPoint, f64, bool)>,
    pub pans: Vec<GeoPoint>,
}

pub struct FakeHandle {
    log: Rc<RefCell<RenderLog>>,
    pane: Pane,
}

impl VisualHandle for FakeHandle {
    fn set_position(&mut self, position: GeoPoint) {
        self.log.borrow_mut().moves.push((self.pane, position));
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.log.borrow_mut().rotations.push((self.pane, degrees));
    }

    fn remove(&mut self) {
        self.log.borrow_mut().removed += 1;
    }
}

/// In-memory `MapRenderer` with a real Web Mercator viewport and a shared
/// operation log. Enough to exercise every layer without a rendering backend.
pub struct FakeRenderer {
    viewport: Viewport,
    pub log: Rc<RefCell<RenderLog>>,
    /// When set, decoration batches fail, for isolation tests.
    pub fail_decorations: bool,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::new(
            GeoPoint::new(39.5, -6.0).unwrap(),
            5.0,
            800.0,
            600.0,
        ))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        FakeRenderer {
            viewport,
            log: Rc::new(RefCell::new(RenderLog::default())),
            fail_decorations: false,
        }
    }

    fn handle(&self, pane: Pane) -> Box<dyn VisualHandle> {
        Box::new(FakeHandle {
            log: Rc::clone(&self.log),
            pane,
        })
    }
}

impl MapRenderer for FakeRenderer {
    fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn set_view(&mut self, center: GeoPoint, zoom: f64, animate: bool) {
        self.viewport.set_view(center, zoom);
        self.log.borrow_mut().set_views.push((center, zoom, animate));
    }

    fn pan_to(&mut self, center: GeoPoint, _animate: bool) {
        let zoom = self.viewport.zoom;
        self.viewport.set_view(center, zoom);
        self.log.borrow_mut().pans.push(center);
    }

    fn add_path(
        &mut self,
        points: &[GeoPoint],
        style: &PathStyle,
        pane: Pane,
    ) -> Result<Box<dyn VisualHandle>> {
        self.log
            .borrow_mut()
            .paths
            .push((points.len(), style.clone()));
        Ok(self.handle(pane))
    }

    fn add_marker(
        &mut self,
        position: GeoPoint,
        style: &MarkerStyle,
        pane: Pane,
    ) -> Result<Box<dyn VisualHandle>> {
        self.log
            .borrow_mut()
            .markers
            .push((position, style.clone()));
        Ok(self.handle(pane))
    }

    fn add_label(
        &mut self,
        position: GeoPoint,
        text: &str,
        width: f64,
        height: f64,
    ) -> Result<Box<dyn VisualHandle>> {
        self.log
            .borrow_mut()
            .labels
            .push((position, text.to_string(), width, height));
        Ok(self.handle(Pane::Label))
    }

    fn add_decorations(&mut self, arrows: &[ArrowDecoration]) -> Result<Box<dyn VisualHandle>> {
        if self.fail_decorations {
            anyhow::bail!("decorations unavailable");
        }
        self.log.borrow_mut().decoration_batches.push(arrows.len());
        Ok(self.handle(Pane::Route))
    }
}
