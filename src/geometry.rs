//! Route geometry as returned by the trip service.
//!
//! Points are kept in GeoJSON order (`[lng, lat]`) so the value can be
//! handed to map renderers and stored alongside saved trips untouched.

use serde::{Deserialize, Serialize};

/// A route line as a sequence of `[lng, lat]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteGeometry {
    points: Vec<[f64; 2]>,
}

impl RouteGeometry {
    /// Creates a geometry from `[lng, lat]` pairs.
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    /// Returns the raw `[lng, lat]` pairs.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the points as (lat, lng) tuples, the order map widgets expect.
    pub fn lat_lngs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|[lng, lat]| (*lat, *lng))
    }

    /// Consumes the geometry and returns the owned `[lng, lat]` pairs.
    pub fn into_points(self) -> Vec<[f64; 2]> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lngs_swaps_axes() {
        let geometry = RouteGeometry::new(vec![[31.2357, 30.0444], [35.9284, 31.9454]]);
        let flipped: Vec<_> = geometry.lat_lngs().collect();
        assert_eq!(flipped, vec![(30.0444, 31.2357), (31.9454, 35.9284)]);
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let geometry = RouteGeometry::new(vec![[1.5, 2.5]]);
        let json = serde_json::to_string(&geometry).unwrap();
        assert_eq!(json, "[[1.5,2.5]]");

        let back: RouteGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, geometry);
    }

    #[test]
    fn test_empty_geometry() {
        let geometry = RouteGeometry::default();
        assert!(geometry.is_empty());
        assert_eq!(geometry.len(), 0);
        assert!(geometry.into_points().is_empty());
    }
}
