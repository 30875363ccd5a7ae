//! OSRM HTTP adapter for trip optimization.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::PlannerError;
use crate::geometry::RouteGeometry;
use crate::model::{OptimizedTrip, TripLeg, TripStop};
use crate::traits::TripOptimizer;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
            user_agent: "trip-planner".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl TripOptimizer for OsrmClient {
    fn optimize(&self, coordinates: &[(f64, f64)]) -> Result<OptimizedTrip, PlannerError> {
        if coordinates.len() < 2 {
            return Err(PlannerError::InsufficientWaypoints);
        }

        let coords = coordinates
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!(
            "{}/trip/v1/{}/{}",
            self.config.base_url, self.config.profile, coords
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("source", "first"),
                ("destination", "last"),
                ("roundtrip", "false"),
            ])
            .send()
            .inspect_err(|err| warn!(error = %err, "trip request failed"))?;

        let status = response.status();
        let body = response.text()?;

        match serde_json::from_str::<OsrmTripResponse>(&body) {
            Ok(payload) => trip_from_response(payload),
            Err(err) if status.is_success() => {
                warn!(error = %err, "undecodable trip response");
                Err(PlannerError::Transport(format!("undecodable trip response: {}", err)))
            }
            Err(_) => {
                warn!(%status, "trip service rejected the request");
                Err(PlannerError::Transport(format!("trip service responded with {}", status)))
            }
        }
    }
}

/// Decodes a raw trip service body.
pub fn parse_trip_response(body: &str) -> Result<OptimizedTrip, PlannerError> {
    let payload = serde_json::from_str::<OsrmTripResponse>(body)
        .map_err(|err| PlannerError::Transport(format!("undecodable trip response: {}", err)))?;
    trip_from_response(payload)
}

fn trip_from_response(payload: OsrmTripResponse) -> Result<OptimizedTrip, PlannerError> {
    if payload.code != "Ok" {
        let reason = payload.message.unwrap_or(payload.code);
        return Err(PlannerError::NoRouteFound(reason));
    }

    let Some(trip) = payload.trips.into_iter().next() else {
        return Err(PlannerError::NoRouteFound("NoTrips".to_string()));
    };

    // Waypoints come back in input order; waypoint_index is the position
    // within the trip.
    let mut waypoints: Vec<OsrmWaypoint> = payload
        .waypoints
        .into_iter()
        .filter(|waypoint| waypoint.trips_index == 0)
        .collect();
    waypoints.sort_by_key(|waypoint| waypoint.waypoint_index);

    let stops = waypoints
        .into_iter()
        .map(|waypoint| TripStop {
            lat: waypoint.location[1],
            lng: waypoint.location[0],
            waypoint_index: waypoint.waypoint_index,
        })
        .collect::<Vec<_>>();

    let legs = trip
        .legs
        .iter()
        .map(|leg| TripLeg {
            distance: leg.distance,
            duration: leg.duration,
        })
        .collect::<Vec<_>>();

    debug!(
        stops = stops.len(),
        legs = legs.len(),
        distance = trip.distance,
        duration = trip.duration,
        "trip optimized"
    );

    Ok(OptimizedTrip {
        distance: trip.distance,
        duration: trip.duration,
        geometry: RouteGeometry::new(trip.geometry.map(|g| g.coordinates).unwrap_or_default()),
        legs,
        stops,
    })
}

#[derive(Debug, Deserialize)]
struct OsrmTripResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    trips: Vec<OsrmTrip>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmTrip {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    location: [f64; 2],
    waypoint_index: usize,
    #[serde(default)]
    trips_index: usize,
}
