//! Saved-trip collaborator.
//!
//! Optimized routes are stored verbatim per user. The caller passes the
//! user's session explicitly; nothing here reads ambient state.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::TripStoreError;
use crate::model::OptimizedRoute;

/// Identifies the signed-in user to the trip store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Persistence for optimized routes.
pub trait TripStore {
    /// All trips saved by the session's user, oldest first.
    fn load_trips(&self, session: &Session) -> Result<Vec<OptimizedRoute>, TripStoreError>;

    fn save_trip(&self, session: &Session, route: &OptimizedRoute) -> Result<(), TripStoreError>;
}

/// In-memory trip storage for tests and local use.
#[derive(Debug, Default)]
pub struct MemoryTripStore {
    trips: RwLock<HashMap<String, Vec<OptimizedRoute>>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn authorize(session: &Session) -> Result<&str, TripStoreError> {
    let token = session.token().trim();
    if token.is_empty() {
        return Err(TripStoreError::Unauthorized);
    }
    Ok(token)
}

impl TripStore for MemoryTripStore {
    fn load_trips(&self, session: &Session) -> Result<Vec<OptimizedRoute>, TripStoreError> {
        let token = authorize(session)?;
        Ok(self.trips.read().get(token).cloned().unwrap_or_default())
    }

    fn save_trip(&self, session: &Session, route: &OptimizedRoute) -> Result<(), TripStoreError> {
        let token = authorize(session)?;
        let mut trips = self.trips.write();
        let saved = trips.entry(token.to_string()).or_default();
        saved.push(route.clone());
        debug!(saved = saved.len(), "trip saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RouteGeometry;

    fn route(distance: &str) -> OptimizedRoute {
        OptimizedRoute {
            distance: distance.to_string(),
            duration: "1h 0m".to_string(),
            coordinates: RouteGeometry::default(),
            waypoints: Vec::new(),
        }
    }

    #[test]
    fn test_trips_are_kept_per_user_in_order() {
        let store = MemoryTripStore::new();
        let alice = Session::new("token-a");
        let bob = Session::new("token-b");

        store.save_trip(&alice, &route("10.0 km")).unwrap();
        store.save_trip(&alice, &route("20.0 km")).unwrap();
        store.save_trip(&bob, &route("30.0 km")).unwrap();

        let distances: Vec<_> = store
            .load_trips(&alice)
            .unwrap()
            .into_iter()
            .map(|r| r.distance)
            .collect();
        assert_eq!(distances, vec!["10.0 km", "20.0 km"]);
        assert_eq!(store.load_trips(&bob).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_user_has_no_trips() {
        let store = MemoryTripStore::new();
        assert!(store.load_trips(&Session::new("fresh")).unwrap().is_empty());
    }

    #[test]
    fn test_blank_token_is_unauthorized() {
        let store = MemoryTripStore::new();
        let anonymous = Session::new("  ");
        assert_eq!(
            store.save_trip(&anonymous, &route("1.0 km")),
            Err(TripStoreError::Unauthorized)
        );
        assert_eq!(store.load_trips(&anonymous), Err(TripStoreError::Unauthorized));
    }
}
