//! Matching optimized trip stops back onto the user's waypoints.
//!
//! The trip service only echoes coordinates (snapped to the road network)
//! and its own indices. Identity, role and display name are restored here
//! by an exact 6-decimal coordinate lookup, falling back to the nearest
//! located waypoint.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::format::{ZERO_DISTANCE, ZERO_DURATION, format_distance, format_duration};
use crate::model::{
    Location, OptimizedRoute, OptimizedTrip, OptimizedWaypoint, TripStop, WaypointEntry,
    WaypointId, WaypointType,
};

/// How each stop of a trip was matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub exact: usize,
    pub nearest: usize,
    pub synthesized: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub route: OptimizedRoute,
    pub stats: ReconcileStats,
}

/// Lookup key for a coordinate: `"lng,lat"` with six decimals.
pub fn coordinate_key(lat: f64, lng: f64) -> String {
    format!("{:.6},{:.6}", lng, lat)
}

/// Builds the final route from a trip and the entries it was computed for.
///
/// Stops keep the trip's visiting order. `entries` is only read.
pub fn reconcile(trip: &OptimizedTrip, entries: &[WaypointEntry]) -> Reconciliation {
    let located: Vec<(&WaypointEntry, &Location)> = entries
        .iter()
        .filter_map(|entry| entry.location.as_ref().map(|location| (entry, location)))
        .collect();

    // Several entries may share a key (a round trip starts and ends at the
    // same place); they are handed out in presentation order.
    let mut by_key: HashMap<String, Vec<&WaypointEntry>> = HashMap::new();
    for &(entry, location) in &located {
        by_key
            .entry(coordinate_key(location.lat, location.lng))
            .or_default()
            .push(entry);
    }
    let mut handed_out: HashMap<String, usize> = HashMap::new();

    let mut stats = ReconcileStats::default();
    let mut waypoints = Vec::with_capacity(trip.stops.len());

    for (order, stop) in trip.stops.iter().enumerate() {
        let key = coordinate_key(stop.lat, stop.lng);

        let exact = by_key.get(&key).map(|candidates| {
            let used = handed_out.entry(key).or_insert(0);
            let entry = candidates[(*used).min(candidates.len() - 1)];
            *used += 1;
            entry
        });

        let matched = match exact {
            Some(entry) => {
                stats.exact += 1;
                Some(entry)
            }
            None => {
                let nearest = nearest_entry(stop, &located);
                if nearest.is_some() {
                    stats.nearest += 1;
                }
                nearest
            }
        };

        let (location, original_waypoint_id, waypoint_type) = match matched {
            Some(entry) => (
                entry.location.clone().unwrap_or_else(|| placeholder(stop, order)),
                entry.id.clone(),
                entry.waypoint_type,
            ),
            None => {
                stats.synthesized += 1;
                (
                    placeholder(stop, order),
                    WaypointId::new(format!("osrm-{}", order)),
                    WaypointType::Hop,
                )
            }
        };

        let (distance_from_previous, duration_from_previous) = match order
            .checked_sub(1)
            .and_then(|previous| trip.legs.get(previous))
        {
            Some(leg) => (format_distance(leg.distance), format_duration(leg.duration)),
            None => (ZERO_DISTANCE.to_string(), ZERO_DURATION.to_string()),
        };

        waypoints.push(OptimizedWaypoint {
            location,
            distance_from_previous,
            duration_from_previous,
            waypoint_index: stop.waypoint_index,
            optimized_order: order,
            original_waypoint_id,
            waypoint_type,
        });
    }

    if stats.synthesized > 0 {
        warn!(synthesized = stats.synthesized, "trip stops without a matching waypoint");
    }
    debug!(
        exact = stats.exact,
        nearest = stats.nearest,
        synthesized = stats.synthesized,
        "trip reconciled"
    );

    Reconciliation {
        route: OptimizedRoute {
            distance: format_distance(trip.distance),
            duration: format_duration(trip.duration),
            coordinates: trip.geometry.clone(),
            waypoints,
        },
        stats,
    }
}

/// Closest located entry in plain degree space. Ties keep the first seen.
fn nearest_entry<'a>(
    stop: &TripStop,
    located: &[(&'a WaypointEntry, &Location)],
) -> Option<&'a WaypointEntry> {
    let mut best: Option<(&'a WaypointEntry, f64)> = None;
    for &(entry, location) in located {
        let d_lat = location.lat - stop.lat;
        let d_lng = location.lng - stop.lng;
        let distance = d_lat * d_lat + d_lng * d_lng;
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((entry, distance));
        }
    }
    best.map(|(entry, _)| entry)
}

fn placeholder(stop: &TripStop, order: usize) -> Location {
    Location::new(format!("Stop {}", order + 1), stop.lat, stop.lng)
        .with_display_name(format!("Unnamed stop {}", order + 1))
}
