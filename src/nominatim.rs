//! Nominatim HTTP adapter for place search.

use std::cmp::Ordering;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{Location, MAX_SUGGESTIONS, MIN_QUERY_CHARS};
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim rejects anonymous clients; identify the application.
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Candidates requested from the service before ranking trims them.
    pub fetch_limit: usize,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "trip-planner".to_string(),
            timeout_secs: 10,
            fetch_limit: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str) -> Vec<Location> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let url = format!("{}/search", self.config.base_url);
        let limit = self.config.fetch_limit.to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
                ("dedupe", "1"),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text());

        match response {
            Ok(body) => {
                let places = parse_search_results(&body);
                debug!(query, results = places.len(), "place search resolved");
                places
            }
            Err(err) => {
                warn!(query, error = %err, "place search failed");
                Vec::new()
            }
        }
    }
}

/// Decodes a search payload into ranked locations.
///
/// Accepts the bare Nominatim array as well as a `{ "results": [...] }`
/// envelope. Error payloads and undecodable bodies yield no results.
pub fn parse_search_results(body: &str) -> Vec<Location> {
    match serde_json::from_str::<SearchPayload>(body) {
        Ok(SearchPayload::Places(places)) | Ok(SearchPayload::Envelope { results: places }) => {
            rank_places(places)
        }
        Ok(SearchPayload::Failure { error }) => {
            warn!(%error, "place search returned an error payload");
            Vec::new()
        }
        Err(err) => {
            warn!(error = %err, "undecodable place search payload");
            Vec::new()
        }
    }
}

fn rank_places(places: Vec<RawPlace>) -> Vec<Location> {
    let mut scored: Vec<(f64, Location)> = places
        .into_iter()
        .filter_map(|place| {
            let score = place.score();
            place.into_location().map(|location| (score, location))
        })
        .collect();

    // Stable: equal scores keep the service's order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, location)| location)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    Places(Vec<RawPlace>),
    Envelope { results: Vec<RawPlace> },
    Failure { error: String },
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    place_id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    lat: Option<Coordinate>,
    #[serde(default)]
    lon: Option<Coordinate>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    importance: Option<f64>,
}

/// Nominatim sends coordinates as strings; other providers send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(value) => Some(*value),
            Coordinate::Text(text) => text.trim().parse::<f64>().ok(),
        };
        value.filter(|value| value.is_finite())
    }
}

impl RawPlace {
    fn type_priority(&self) -> f64 {
        match (self.class.as_deref(), self.kind.as_deref()) {
            (Some("place"), Some("city" | "town" | "village")) => 3.0,
            (Some("boundary"), Some("administrative")) => 2.0,
            (Some("highway"), _) => 1.0,
            _ => 0.0,
        }
    }

    fn score(&self) -> f64 {
        self.type_priority() + self.importance.unwrap_or(0.0)
    }

    fn into_location(self) -> Option<Location> {
        let display_name = self.display_name.filter(|name| !name.is_empty())?;
        let lat = self.lat.as_ref().and_then(Coordinate::value)?;
        let lng = self.lon.as_ref().and_then(Coordinate::value)?;

        let name = match self.name.filter(|name| !name.trim().is_empty()) {
            Some(name) => name,
            None => display_name
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        };

        let place_id = self.place_id.and_then(|id| match id {
            serde_json::Value::String(text) => Some(text),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        });

        Some(Location {
            name,
            display_name,
            lat,
            lng,
            place_id,
        })
    }
}
