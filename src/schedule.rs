use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::map_data::GeoPoint;

/// One day range parked at a named waypoint. Ranges are inclusive on both
/// ends. Overlap between entries is tolerated; resolution is first-match-wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day_from: i32,
    pub day_to: i32,
    pub waypoint_name: String,
}

/// Ordered day-range table plus the name -> coordinate lookup for the named
/// waypoints. Both are supplied by the host; waypoint names are opaque here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub waypoints: HashMap<String, GeoPoint>,
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>, waypoints: HashMap<String, GeoPoint>) -> Self {
        for pair in entries.windows(2) {
            if pair[1].day_from <= pair[0].day_to {
                debug!(
                    "schedule entries overlap: [{},{}] and [{},{}], first match wins",
                    pair[0].day_from, pair[0].day_to, pair[1].day_from, pair[1].day_to
                );
            }
        }
        Schedule { entries, waypoints }
    }

    /// Waypoint name for a day. Out-of-range days clamp to the first/last
    /// entry, so any integer day resolves to a name as long as the table is
    /// non-empty.
    pub fn waypoint_name_for_day(&self, day: i32) -> Option<&str> {
        let first = self.entries.first()?;
        for entry in &self.entries {
            if entry.day_from <= day && day <= entry.day_to {
                return Some(&entry.waypoint_name);
            }
        }
        if day < first.day_from {
            Some(&first.waypoint_name)
        } else {
            // past the end, and also gaps between ranges
            self.entries.last().map(|e| e.waypoint_name.as_str())
        }
    }

    /// Coordinate of the waypoint the day resolves to, when the host provided
    /// a lookup entry for that name.
    pub fn target_for_day(&self, day: i32) -> Option<GeoPoint> {
        let name = self.waypoint_name_for_day(day)?;
        self.waypoints.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Schedule {
        let entries = vec![
            ScheduleEntry {
                day_from: 1,
                day_to: 1,
                waypoint_name: "A".into(),
            },
            ScheduleEntry {
                day_from: 2,
                day_to: 3,
                waypoint_name: "B".into(),
            },
            ScheduleEntry {
                day_from: 4,
                day_to: 6,
                waypoint_name: "C".into(),
            },
        ];
        Schedule::new(entries, HashMap::new())
    }

    #[test]
    fn in_range_days_match_their_entry() {
        let s = schedule();
        assert_eq!(s.waypoint_name_for_day(1), Some("A"));
        assert_eq!(s.waypoint_name_for_day(2), Some("B"));
        assert_eq!(s.waypoint_name_for_day(3), Some("B"));
        assert_eq!(s.waypoint_name_for_day(5), Some("C"));
    }

    #[test]
    fn out_of_range_days_clamp_to_the_edges() {
        let s = schedule();
        assert_eq!(s.waypoint_name_for_day(0), Some("A"));
        assert_eq!(s.waypoint_name_for_day(-100), Some("A"));
        assert_eq!(s.waypoint_name_for_day(7), Some("C"));
        assert_eq!(s.waypoint_name_for_day(i32::MAX), Some("C"));
    }

    #[test]
    fn overlapping_entries_resolve_first_match() {
        let entries = vec![
            ScheduleEntry {
                day_from: 1,
                day_to: 5,
                waypoint_name: "A".into(),
            },
            ScheduleEntry {
                day_from: 3,
                day_to: 8,
                waypoint_name: "B".into(),
            },
        ];
        let s = Schedule::new(entries, HashMap::new());
        assert_eq!(s.waypoint_name_for_day(4), Some("A"));
        assert_eq!(s.waypoint_name_for_day(6), Some("B"));
    }

    #[test]
    fn empty_schedule_has_no_answer() {
        let s = Schedule::default();
        assert_eq!(s.waypoint_name_for_day(1), None);
    }
}
