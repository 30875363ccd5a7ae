//! Real city locations along desert road trips.
//!
//! Coordinates are Nominatim centroids, good enough to route with OSRM
//! extracts of the region.

use trip_planner::model::Location;

/// A named place with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn location(&self) -> Location {
        Location::new(self.name, self.lat, self.lng)
    }
}

// ============================================================================
// Trip endpoints
// ============================================================================

pub const CAIRO: Place = Place::new("Cairo", 30.0443879, 31.2357257);
pub const DUBAI: Place = Place::new("Dubai", 25.2653471, 55.2924914);
pub const AMMAN: Place = Place::new("Amman", 31.9515694, 35.9239625);

// ============================================================================
// Candidate hops
// ============================================================================

pub const HOPS: &[Place] = &[
    Place::new("Petra", 30.3284544, 35.4443622),
    Place::new("Aqaba", 29.5267141, 35.0077638),
    Place::new("Riyadh", 24.638916, 46.7160104),
    Place::new("Tabuk", 28.3835079, 36.5661908),
    Place::new("Al Ula", 26.6169227, 37.9234061),
    Place::new("Hail", 27.5114102, 41.7208243),
    Place::new("Abu Dhabi", 24.4538352, 54.3774014),
    Place::new("Muscat", 23.5882019, 58.3829448),
    Place::new("Doha", 25.2856329, 51.5264162),
    Place::new("Kuwait City", 29.3797091, 47.9735629),
];
