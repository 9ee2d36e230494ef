use crate::label_placer::LabelRequest;
use crate::map_data::{GeoPoint, MapMarker, MarkerCategory};
use crate::map_surface::MapSurface;
use crate::renderer::{MarkerStyle, Pane, VisualHandle};

pub struct MarkerEntry {
    pub position: GeoPoint,
    pub name: Option<String>,
    pub day: Option<i32>,
    pub category: Option<MarkerCategory>,
    handle: Box<dyn VisualHandle>,
    emphasized: bool,
}

/// One visual per valid marker, colored by category, carrying the day/name
/// metadata the fitter and the label pass query.
pub struct MarkerLayer {
    entries: Vec<MarkerEntry>,
}

impl MarkerLayer {
    /// Draws the supplied markers. Entries with invalid coordinates are
    /// silently dropped so they can never reach bounds math or label
    /// placement; the rest of the list is unaffected.
    pub fn build(surface: &mut MapSurface, markers: &[MapMarker]) -> MarkerLayer {
        let mut entries = Vec::new();
        let Some(renderer) = surface.renderer_mut() else {
            return MarkerLayer { entries };
        };

        let mut dropped = 0;
        for marker in markers {
            let Some(position) = marker.position() else {
                dropped += 1;
                continue;
            };
            let fill = marker
                .category
                .unwrap_or(MarkerCategory::Tour)
                .fill_color();
            let mut style = MarkerStyle::base(fill);
            style.tooltip = marker.name.clone();
            match renderer.add_marker(position, &style, Pane::Marker) {
                Ok(handle) => entries.push(MarkerEntry {
                    position,
                    name: marker.name.clone(),
                    day: marker.day,
                    category: marker.category,
                    handle,
                    emphasized: false,
                }),
                Err(e) => warn!("failed to draw marker: {e}"),
            }
        }
        if dropped > 0 {
            debug!("dropped {dropped} markers with invalid coordinates");
        }
        MarkerLayer { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MarkerEntry] {
        &self.entries
    }

    /// The subset relevant to a day: exact day match, falling back to the
    /// previous day, then the next, then all day-less markers.
    pub fn select_for_day(&self, day: i32) -> Vec<usize> {
        for candidate in [Some(day), Some(day - 1), Some(day + 1)] {
            let matched: Vec<usize> = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.day.is_some() && e.day == candidate)
                .map(|(i, _)| i)
                .collect();
            if !matched.is_empty() {
                return matched;
            }
        }
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.day.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of named markers whose name is in `names`, for overview-mode
    /// labels.
    pub fn select_by_name(&self, names: &[String]) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.name
                    .as_deref()
                    .map(|n| names.iter().any(|w| w.eq_ignore_ascii_case(n)))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn positions(&self, indices: &[usize]) -> Vec<GeoPoint> {
        indices.iter().map(|&i| self.entries[i].position).collect()
    }

    /// Upgrades the focused subset to the emphasized style by redrawing those
    /// markers. Markers outside the subset keep their current style.
    pub fn emphasize(&mut self, surface: &mut MapSurface, indices: &[usize]) {
        let Some(renderer) = surface.renderer_mut() else {
            return;
        };
        for &i in indices {
            let entry = &mut self.entries[i];
            if entry.emphasized {
                continue;
            }
            let fill = entry.category.unwrap_or(MarkerCategory::Tour).fill_color();
            let mut style = MarkerStyle::emphasized(fill);
            style.tooltip = entry.name.clone();
            match renderer.add_marker(entry.position, &style, Pane::Marker) {
                Ok(handle) => {
                    entry.handle.remove();
                    entry.handle = handle;
                    entry.emphasized = true;
                }
                Err(e) => warn!("failed to emphasize marker: {e}"),
            }
        }
    }

    /// Label requests for the given subset, in marker order. Unnamed markers
    /// have nothing to say.
    pub fn label_requests(&self, indices: &[usize]) -> Vec<LabelRequest> {
        indices
            .iter()
            .filter_map(|&i| {
                let entry = &self.entries[i];
                entry.name.as_ref().map(|name| LabelRequest {
                    marker_index: i,
                    text: name.clone(),
                    anchor: entry.position,
                })
            })
            .collect()
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.handle.remove();
        }
        self.entries.clear();
    }
}
