//! Test fixtures for trip-planner.
//!
//! Provides real Middle East / North Africa city locations (from
//! OpenStreetMap).

pub mod desert_locations;

pub use desert_locations::*;
