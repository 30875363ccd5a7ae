//! Collaborator seams for the planner.
//!
//! The planner only ever talks to the outside world through these traits.
//! `nominatim` and `osrm` provide the HTTP implementations; tests plug in
//! canned ones.

use crate::error::PlannerError;
use crate::model::{Location, OptimizedTrip};

/// Resolves free text into candidate places.
pub trait Geocoder {
    /// Returns at most five candidates, most relevant first.
    ///
    /// Failures of any kind resolve to an empty list; search problems are
    /// never reported to the user.
    fn search(&self, query: &str) -> Vec<Location>;
}

/// Computes the shortest visiting order for a set of coordinates.
pub trait TripOptimizer {
    /// `coordinates` are (lat, lng) in candidate order: start first,
    /// destination last. The returned stops are in visiting order.
    fn optimize(&self, coordinates: &[(f64, f64)]) -> Result<OptimizedTrip, PlannerError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn search(&self, query: &str) -> Vec<Location> {
        (**self).search(query)
    }
}

impl<T: TripOptimizer + ?Sized> TripOptimizer for &T {
    fn optimize(&self, coordinates: &[(f64, f64)]) -> Result<OptimizedTrip, PlannerError> {
        (**self).optimize(coordinates)
    }
}
