mod test_utils;

use itinerary_map_core::label_placer::{
    label_width, max_labels_for_zoom, place_labels, sample_route_rects, LabelRequest,
};
use itinerary_map_core::map_data::GeoPoint;
use itinerary_map_core::route_path::RoutePath;
use itinerary_map_core::viewport::{ScreenRect, Viewport};
use test_utils::{test_markers, test_route};

fn viewport() -> Viewport {
    Viewport::new(GeoPoint::new(39.5, -6.0).unwrap(), 7.0, 800.0, 600.0)
}

fn requests_from_test_markers() -> Vec<LabelRequest> {
    test_markers()
        .iter()
        .enumerate()
        .map(|(i, m)| LabelRequest {
            marker_index: i,
            text: m.name.clone().unwrap(),
            anchor: m.position().unwrap(),
        })
        .collect()
}

fn rect_size(rect: &ScreenRect) -> (f64, f64) {
    (rect.right - rect.left, rect.bottom - rect.top)
}

#[test]
fn placed_labels_never_overlap_each_other() {
    let vp = viewport();
    let requests = requests_from_test_markers();
    let placements = place_labels(&requests, &[], &vp, 99);
    assert!(!placements.is_empty());
    for (i, a) in placements.iter().enumerate() {
        for b in placements.iter().skip(i + 1) {
            assert!(
                !a.rect.overlaps(&b.rect),
                "labels '{}' and '{}' overlap",
                a.text,
                b.text
            );
        }
    }
}

#[test]
fn placed_labels_stay_inside_the_viewport_margin() {
    let vp = viewport();
    let requests = requests_from_test_markers();
    for p in place_labels(&requests, &[], &vp, 99) {
        assert!(p.rect.left >= 6.0, "label '{}' crosses the left margin", p.text);
        assert!(p.rect.top >= 6.0);
        assert!(p.rect.right <= vp.width - 6.0);
        assert!(p.rect.bottom <= vp.height - 6.0);
    }
}

#[test]
fn placed_labels_avoid_the_route_rectangles() {
    let vp = viewport();
    let path = RoutePath::from_line_string(&test_route().geometry).unwrap();
    let projected: Vec<_> = path.points().iter().map(|p| vp.project(p)).collect();
    let route_rects = sample_route_rects(&projected);
    assert!(!route_rects.is_empty());

    let requests = requests_from_test_markers();
    for p in place_labels(&requests, &route_rects, &vp, 99) {
        for r in &route_rects {
            assert!(!p.rect.overlaps(r), "label '{}' covers the route", p.text);
        }
    }
}

#[test]
fn dense_cluster_still_gets_nonoverlapping_labels() {
    // five markers within ~20px of each other on screen
    let vp = viewport();
    let center = vp.project(&GeoPoint::new(39.5, -6.0).unwrap());
    let requests: Vec<LabelRequest> = (0..5)
        .map(|i| {
            let px = itinerary_map_core::viewport::ScreenPoint::new(
                center.x + (i as f64) * 4.0,
                center.y + (i as f64) * 3.0,
            );
            LabelRequest {
                marker_index: i,
                text: format!("Stop {i}"),
                anchor: vp.unproject(&px),
            }
        })
        .collect();

    let placements = place_labels(&requests, &[], &vp, 99);
    // the ring search goes far enough out that all five find a slot
    assert_eq!(placements.len(), 5);
    for (i, a) in placements.iter().enumerate() {
        for b in placements.iter().skip(i + 1) {
            assert!(!a.rect.overlaps(&b.rect));
        }
    }
}

#[test]
fn max_labels_cap_is_honored() {
    let vp = viewport();
    let requests = requests_from_test_markers();
    let placements = place_labels(&requests, &[], &vp, 3);
    assert_eq!(placements.len(), 3);
    // input order wins: the first three requests got the slots
    let indices: Vec<usize> = placements.iter().map(|p| p.marker_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn placement_is_deterministic() {
    let vp = viewport();
    let requests = requests_from_test_markers();
    let a = place_labels(&requests, &[], &vp, 99);
    let b = place_labels(&requests, &[], &vp, 99);
    assert_eq!(a, b);
}

#[test]
fn placement_rect_matches_the_label_width_formula() {
    let vp = viewport();
    let requests = requests_from_test_markers();
    for p in place_labels(&requests, &[], &vp, 99) {
        let (w, h) = rect_size(&p.rect);
        assert_eq!(w, label_width(&p.text));
        assert_eq!(h, 18.0);
    }
}

#[test]
fn offscreen_anchor_yields_no_placement() {
    let vp = viewport();
    // Lisbon-ish point far outside an 800x600 view centered over Extremadura
    // at high zoom
    let vp_zoomed = Viewport::new(vp.center, 12.0, 800.0, 600.0);
    let requests = vec![LabelRequest {
        marker_index: 0,
        text: "Lisboa".to_string(),
        anchor: GeoPoint::new(38.7223, -9.1393).unwrap(),
    }];
    let placements = place_labels(&requests, &[], &vp_zoomed, 99);
    assert!(placements.is_empty());
}

#[test]
fn zoom_caps_match_the_overview_detail_ladder() {
    assert_eq!(max_labels_for_zoom(4.0), 3);
    assert_eq!(max_labels_for_zoom(7.99), 3);
    assert_eq!(max_labels_for_zoom(9.0), 6);
    assert_eq!(max_labels_for_zoom(13.0), 99);
}
