//! trip-planner core
//!
//! Waypoint bookkeeping, debounced place search and reconciliation of
//! externally optimized trips back onto the user's named stops.

pub mod error;
pub mod format;
pub mod geometry;
pub mod model;
pub mod traits;
pub mod nominatim;
pub mod osrm;
pub mod store;
pub mod debounce;
pub mod reconcile;
pub mod planner;
pub mod trips;
