//! Planner data model: locations, waypoint entries and optimized routes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::RouteGeometry;

/// Maximum number of intermediate stops.
pub const MAX_HOPS: usize = 10;

/// Queries shorter than this never trigger a lookup.
pub const MIN_QUERY_CHARS: usize = 3;

/// Maximum number of suggestions attached to an entry.
pub const MAX_SUGGESTIONS: usize = 5;

/// Stable identity of a waypoint entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(String);

impl WaypointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn start() -> Self {
        Self::new("start")
    }

    pub fn destination() -> Self {
        Self::new("destination")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WaypointId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub display_name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            lat,
            lng,
            place_id: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Coordinates as (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Role of a waypoint in the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointType {
    Start,
    Hop,
    Destination,
}

/// One row of the planner: a stop being searched for or already located.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointEntry {
    pub id: WaypointId,
    pub location: Option<Location>,
    pub query: String,
    pub suggestions: Vec<Location>,
    pub waypoint_type: WaypointType,
    pub is_searching: bool,
}

impl WaypointEntry {
    pub fn new(id: WaypointId, waypoint_type: WaypointType) -> Self {
        Self {
            id,
            location: None,
            query: String::new(),
            suggestions: Vec::new(),
            waypoint_type,
            is_searching: false,
        }
    }

    pub fn is_hop(&self) -> bool {
        self.waypoint_type == WaypointType::Hop
    }

    /// True when the query is empty or whitespace only.
    pub fn has_blank_query(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// A stop of an optimized trip, matched back to the entry it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedWaypoint {
    pub location: Location,
    pub distance_from_previous: String,
    pub duration_from_previous: String,
    /// Index reported by the trip service.
    pub waypoint_index: usize,
    /// Position in the visiting sequence. Authoritative for display.
    pub optimized_order: usize,
    pub original_waypoint_id: WaypointId,
    pub waypoint_type: WaypointType,
}

/// Result of a successful optimize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub distance: String,
    pub duration: String,
    pub coordinates: RouteGeometry,
    pub waypoints: Vec<OptimizedWaypoint>,
}

/// A stop as returned by the trip service, stripped of identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TripStop {
    pub lat: f64,
    pub lng: f64,
    pub waypoint_index: usize,
}

/// Distance (meters) and duration (seconds) between two consecutive stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripLeg {
    pub distance: f64,
    pub duration: f64,
}

/// Normalized trip service response. `stops` are in visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedTrip {
    pub distance: f64,
    pub duration: f64,
    pub geometry: RouteGeometry,
    pub legs: Vec<TripLeg>,
    pub stops: Vec<TripStop>,
}
