#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub mod geo_utils;
pub mod itinerary_map;
pub mod label_placer;
pub mod logs;
pub mod map_data;
pub mod map_surface;
pub mod marker_layer;
pub mod renderer;
pub mod route_layer;
pub mod route_path;
pub mod schedule;
pub mod vehicle_tracker;
pub mod viewport;
pub mod viewport_fitter;
